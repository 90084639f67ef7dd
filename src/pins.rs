//! GPIO / peripheral assignments for the fish main board.
//!
//! Single source of truth for the defaults in [`ExperimentConfig`](crate::config::ExperimentConfig).
//! All numbers are Broadcom (BCM) GPIO numbers, not header positions.

// ---------------------------------------------------------------------------
// Fin coil drivers (two pins per fin, alternately driven)
// ---------------------------------------------------------------------------

pub const FIN_CAUDAL_A_GPIO: u8 = 20;
pub const FIN_CAUDAL_B_GPIO: u8 = 21;

pub const FIN_DORSAL_A_GPIO: u8 = 19;
pub const FIN_DORSAL_B_GPIO: u8 = 26;

pub const FIN_PECTORAL_RIGHT_A_GPIO: u8 = 6;
pub const FIN_PECTORAL_RIGHT_B_GPIO: u8 = 13;

pub const FIN_PECTORAL_LEFT_A_GPIO: u8 = 16;
pub const FIN_PECTORAL_LEFT_B_GPIO: u8 = 12;

// ---------------------------------------------------------------------------
// Fin drive frequencies
// ---------------------------------------------------------------------------

pub const CAUDAL_FREQ_HZ: f32 = 5.0;
pub const DORSAL_FREQ_HZ: f32 = 6.0;
pub const PECTORAL_FREQ_HZ: f32 = 8.0;

/// Upper bound accepted by config validation.
pub const MAX_FIN_FREQ_HZ: f32 = 50.0;

// ---------------------------------------------------------------------------
// Indicator LEDs (driven together through one transistor)
// ---------------------------------------------------------------------------

pub const INDICATOR_GPIO: u8 = 22;

// ---------------------------------------------------------------------------
// Photodiode (ADC exposed through the Linux IIO subsystem)
// ---------------------------------------------------------------------------

pub const PHOTODIODE_ADC_PATH: &str = "/sys/bus/iio/devices/iio:device0/in_voltage0_raw";

/// 10-bit converter full scale.
pub const ADC_MAX_COUNTS: u16 = 1023;

// ---------------------------------------------------------------------------
// Linux GPIO
// ---------------------------------------------------------------------------

pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Highest GPIO routed to the 40-pin header.
pub const MAX_BCM_GPIO: u8 = 27;
