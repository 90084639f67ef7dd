//! Experiment configuration parameters
//!
//! All tunable parameters for one swim experiment.  Values can be
//! overridden from a JSON file (see [`JsonConfigFile`](crate::adapters::config_file::JsonConfigFile));
//! any field missing from the file keeps its default.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::drivers::fin::FinId;
use crate::pins;

/// Pin pair and drive frequency of one fin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinConfig {
    pub pin_a: u8,
    pub pin_b: u8,
    /// Oscillation frequency in Hz
    pub freq_hz: f32,
}

impl FinConfig {
    pub const fn new(pin_a: u8, pin_b: u8, freq_hz: f32) -> Self {
        Self {
            pin_a,
            pin_b,
            freq_hz,
        }
    }
}

/// The four fins of the fish.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinsConfig {
    pub caudal: FinConfig,
    pub dorsal: FinConfig,
    pub pectoral_left: FinConfig,
    pub pectoral_right: FinConfig,
}

impl FinsConfig {
    pub fn get(&self, id: FinId) -> &FinConfig {
        match id {
            FinId::Caudal => &self.caudal,
            FinId::Dorsal => &self.dorsal,
            FinId::PectoralLeft => &self.pectoral_left,
            FinId::PectoralRight => &self.pectoral_right,
        }
    }
}

impl Default for FinsConfig {
    fn default() -> Self {
        Self {
            caudal: FinConfig::new(
                pins::FIN_CAUDAL_A_GPIO,
                pins::FIN_CAUDAL_B_GPIO,
                pins::CAUDAL_FREQ_HZ,
            ),
            dorsal: FinConfig::new(
                pins::FIN_DORSAL_A_GPIO,
                pins::FIN_DORSAL_B_GPIO,
                pins::DORSAL_FREQ_HZ,
            ),
            pectoral_left: FinConfig::new(
                pins::FIN_PECTORAL_LEFT_A_GPIO,
                pins::FIN_PECTORAL_LEFT_B_GPIO,
                pins::PECTORAL_FREQ_HZ,
            ),
            pectoral_right: FinConfig::new(
                pins::FIN_PECTORAL_RIGHT_A_GPIO,
                pins::FIN_PECTORAL_RIGHT_B_GPIO,
                pins::PECTORAL_FREQ_HZ,
            ),
        }
    }
}

/// Core experiment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    // --- Trigger ---
    /// Idle ends once the photodiode reads at or below this (lights off: ~2, lights on: ~400)
    pub brightness_threshold: u16,

    // --- Timing ---
    /// Length of the active phase (seconds)
    pub run_duration_secs: u32,
    /// Indicator on/off time of one flash (milliseconds)
    pub flash_ms: u32,
    /// Sleep between photodiode polls (milliseconds, 0 = busy-poll)
    pub poll_interval_ms: u32,

    // --- Hardware ---
    pub fins: FinsConfig,
    pub indicator_gpio: u8,
    pub photodiode_adc_path: PathBuf,
    pub gpio_root: PathBuf,

    // --- Output ---
    /// Directory the per-run output folder is created in
    pub output_root: PathBuf,
    /// Append every poll to `photodiode.csv` in the run folder
    pub record_csv: bool,

    // --- Simulation ---
    /// Use in-memory pins and a scripted photodiode instead of hardware
    pub simulate: bool,
    /// Number of bright polls the scripted photodiode reports before going dark
    pub sim_light_polls: u32,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            // Trigger
            brightness_threshold: 50,

            // Timing
            run_duration_secs: 60,
            flash_ms: 1000,
            poll_interval_ms: 10,

            // Hardware
            fins: FinsConfig::default(),
            indicator_gpio: pins::INDICATOR_GPIO,
            photodiode_adc_path: PathBuf::from(pins::PHOTODIODE_ADC_PATH),
            gpio_root: PathBuf::from(pins::SYSFS_GPIO_ROOT),

            // Output
            output_root: PathBuf::from("."),
            record_csv: true,

            // Simulation
            simulate: false,
            sim_light_polls: 200,
        }
    }
}

impl ExperimentConfig {
    pub fn run_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.run_duration_secs))
    }

    pub fn flash(&self) -> Duration {
        Duration::from_millis(u64::from(self.flash_ms))
    }

    /// Every pin the experiment reserves: fin pairs in [`FinId::ALL`] order, then the indicator.
    pub fn claimed_pins(&self) -> [u8; 9] {
        let mut out = [0u8; 9];
        for (i, id) in FinId::ALL.iter().enumerate() {
            let fin = self.fins.get(*id);
            out[i * 2] = fin.pin_a;
            out[i * 2 + 1] = fin.pin_b;
        }
        out[8] = self.indicator_gpio;
        out
    }

    /// Range-check every field.  Returns the name of the first offending rule.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.brightness_threshold == 0 {
            return Err("brightness_threshold must be > 0");
        }
        if self.flash_ms == 0 {
            return Err("flash_ms must be > 0");
        }
        for id in FinId::ALL {
            let f = self.fins.get(id).freq_hz;
            if f.is_nan() || f <= 0.0 || f > pins::MAX_FIN_FREQ_HZ {
                return Err("fin freq_hz must be in (0, 50]");
            }
        }

        let claimed = self.claimed_pins();
        if claimed.iter().any(|&p| p > pins::MAX_BCM_GPIO) {
            return Err("pin number above BCM 27");
        }
        for (i, a) in claimed.iter().enumerate() {
            if claimed[i + 1..].contains(a) {
                return Err("pin assigned twice");
            }
        }
        Ok(())
    }
}
