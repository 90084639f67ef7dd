//! Linux sysfs GPIO adapter.
//!
//! Implements [`GpioBank`] on top of `/sys/class/gpio`:
//!
//! 1. write the pin number to `export` (skipped if `gpioN/` already exists),
//! 2. write `low` to `gpioN/direction` (output, initially low, no glitch),
//! 3. drive the pin by writing `0`/`1` to `gpioN/value`,
//! 4. on release, write every claimed pin number to `unexport`.
//!
//! The root directory is configurable so the adapter can be exercised
//! against a plain directory tree in tests.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use embedded_hal::digital::{ErrorType, OutputPin};
use log::{debug, warn};

use crate::drivers::gpio::GpioBank;
use crate::error::{GpioError, Result};

/// How long to wait for udev to create `gpioN/` after an export.
const EXPORT_SETTLE: Duration = Duration::from_millis(500);

pub struct SysfsGpio {
    root: PathBuf,
    exported: Vec<u8>,
    settle: Duration,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exported: Vec::new(),
            settle: EXPORT_SETTLE,
        }
    }

    /// Override the post-export wait.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    fn pin_dir(&self, gpio: u8) -> PathBuf {
        self.root.join(format!("gpio{gpio}"))
    }

    fn export(&self, gpio: u8, dir: &Path) -> Result<()> {
        fs::write(self.root.join("export"), gpio.to_string())
            .map_err(|_| GpioError::ExportFailed(gpio))?;

        let deadline = Instant::now() + self.settle;
        while !dir.join("direction").exists() {
            if Instant::now() >= deadline {
                return Err(GpioError::ExportFailed(gpio).into());
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        Ok(())
    }
}

impl GpioBank for SysfsGpio {
    type Pin = SysfsPin;

    fn claim_output(&mut self, gpio: u8) -> Result<SysfsPin> {
        let dir = self.pin_dir(gpio);
        if !dir.exists() {
            self.export(gpio, &dir)?;
        }
        self.exported.push(gpio);

        fs::write(dir.join("direction"), "low").map_err(|_| GpioError::DirectionFailed(gpio))?;
        let value = OpenOptions::new()
            .write(true)
            .open(dir.join("value"))
            .map_err(|_| GpioError::DirectionFailed(gpio))?;

        debug!("sysfs: gpio{} claimed as output", gpio);
        Ok(SysfsPin { gpio, value })
    }

    fn release_all(&mut self) -> Result<()> {
        let unexport = self.root.join("unexport");
        let mut first = Ok(());
        for gpio in self.exported.drain(..) {
            if fs::write(&unexport, gpio.to_string()).is_err() {
                warn!("sysfs: unexport of gpio{} failed", gpio);
                if first.is_ok() {
                    first = Err(GpioError::UnexportFailed(gpio).into());
                }
            }
        }
        first
    }
}

/// Output pin backed by a sysfs `value` file.
#[derive(Debug)]
pub struct SysfsPin {
    gpio: u8,
    value: File,
}

impl SysfsPin {
    fn write(&mut self, level: &[u8]) -> core::result::Result<(), GpioError> {
        self.value
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.value.write_all(level))
            .map_err(|_| GpioError::WriteFailed(self.gpio))
    }
}

impl ErrorType for SysfsPin {
    type Error = GpioError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> core::result::Result<(), GpioError> {
        self.write(b"0")
    }

    fn set_high(&mut self) -> core::result::Result<(), GpioError> {
        self.write(b"1")
    }
}
