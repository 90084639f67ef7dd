//! Linux IIO ADC adapter.
//!
//! The photodiode front-end sits on an ADC whose kernel driver exposes each
//! channel as a `in_voltageN_raw` file under `/sys/bus/iio/devices`.  Every
//! read of that file triggers a fresh conversion.

use std::fs;
use std::path::PathBuf;

use crate::error::SensorError;
use crate::pins::ADC_MAX_COUNTS;
use crate::sensors::AdcChannel;

pub struct IioAdc {
    path: PathBuf,
}

impl IioAdc {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AdcChannel for IioAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        let text = fs::read_to_string(&self.path).map_err(|_| SensorError::AdcReadFailed)?;
        let raw: i64 = text.trim().parse().map_err(|_| SensorError::Malformed)?;
        match u16::try_from(raw) {
            Ok(counts) if counts <= ADC_MAX_COUNTS => Ok(counts),
            _ => Err(SensorError::OutOfRange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_trimmed_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in_voltage0_raw");
        fs::write(&path, "412\n").unwrap();
        assert_eq!(IioAdc::new(&path).read_raw(), Ok(412));
    }

    #[test]
    fn maps_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in_voltage0_raw");

        assert_eq!(IioAdc::new(&path).read_raw(), Err(SensorError::AdcReadFailed));

        fs::write(&path, "bright").unwrap();
        assert_eq!(IioAdc::new(&path).read_raw(), Err(SensorError::Malformed));

        fs::write(&path, "-3").unwrap();
        assert_eq!(IioAdc::new(&path).read_raw(), Err(SensorError::OutOfRange));

        fs::write(&path, "1024").unwrap();
        assert_eq!(IioAdc::new(&path).read_raw(), Err(SensorError::OutOfRange));
    }
}
