//! Indicator LED driver.
//!
//! The fish carries a small LED cluster switched by one GPIO through a
//! transistor.  It is only ever fully on or fully off and is used to mark
//! phase changes for the camera filming the tank.

use embedded_hal::digital::OutputPin;

use crate::error::{GpioError, Result};

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

pub struct StatusLed<P> {
    pin: P,
    active: ActiveLevel,
    is_on: bool,
}

impl<P: OutputPin<Error = GpioError>> StatusLed<P> {
    /// Wrap `pin`, switching the LED off.
    pub fn new(pin: P, active: ActiveLevel) -> Result<Self> {
        let mut led = Self {
            pin,
            active,
            is_on: true,
        };
        led.set(false)?;
        Ok(led)
    }

    pub fn set(&mut self, on: bool) -> Result<()> {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high()?,
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low()?,
        }
        self.is_on = on;
        Ok(())
    }

    pub fn on(&mut self) -> Result<()> {
        self.set(true)
    }

    pub fn off(&mut self) -> Result<()> {
        self.set(false)
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }
}
