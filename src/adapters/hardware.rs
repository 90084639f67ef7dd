//! Hardware adapter: bridges the photodiode and indicator to domain port traits.
//!
//! Owns the [`Photodiode`] and [`StatusLed`] drivers and exposes them through
//! [`LightSensorPort`] and [`IndicatorPort`].  Whether the pins and ADC
//! underneath are real or simulated is decided when the drivers are built.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{IndicatorPort, LightSensorPort};
use crate::drivers::status_led::StatusLed;
use crate::error::{GpioError, Result};
use crate::sensors::AdcChannel;
use crate::sensors::photodiode::Photodiode;

/// Concrete adapter that combines the sensor and indicator behind port traits.
pub struct HardwareAdapter<A, P> {
    photodiode: Photodiode<A>,
    led: StatusLed<P>,
}

impl<A, P> HardwareAdapter<A, P> {
    pub fn new(photodiode: Photodiode<A>, led: StatusLed<P>) -> Self {
        Self { photodiode, led }
    }
}

// ── LightSensorPort implementation ────────────────────────────

impl<A: AdcChannel, P> LightSensorPort for HardwareAdapter<A, P> {
    fn update(&mut self) -> Result<u16> {
        Ok(self.photodiode.update()?)
    }

    fn brightness(&self) -> u16 {
        self.photodiode.brightness()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<A, P: OutputPin<Error = GpioError>> IndicatorPort for HardwareAdapter<A, P> {
    fn on(&mut self) -> Result<()> {
        self.led.on()
    }

    fn off(&mut self) -> Result<()> {
        self.led.off()
    }

    fn is_on(&self) -> bool {
        self.led.is_on()
    }
}
