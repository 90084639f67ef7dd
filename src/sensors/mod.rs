//! Sensor subsystem.
//!
//! Only the photodiode matters for the experiment.  It sits behind an
//! [`AdcChannel`] so the same driver reads a Linux IIO converter on the
//! fish and a scripted source in simulation and tests.

pub mod photodiode;

use crate::error::SensorError;

/// One single-ended ADC input.
pub trait AdcChannel {
    /// Take one raw conversion.
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}
