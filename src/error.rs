//! Unified error types for the experiment controller.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! orchestration code's error handling uniform.  All variants are `Copy`
//! so they can be handed back from fin threads and compared in tests.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The photodiode could not be read or returned garbage.
    Sensor(SensorError),
    /// A fin or the indicator could not be driven.
    Actuator(ActuatorError),
    /// A GPIO pin could not be reserved or released.
    Gpio(GpioError),
    /// Peripheral or thread initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC channel read returned an I/O error.
    AdcReadFailed,
    /// ADC channel produced something that is not a count.
    Malformed,
    /// Reading is outside the converter's range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::Malformed => write!(f, "malformed ADC value"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Output pin write failed.
    GpioWriteFailed,
    /// A fin thread panicked before it could report.
    TaskPanicked,
    /// The fin drive state was poisoned by an earlier panic.
    DrivePoisoned,
    /// `run` was called on a fin that is already running.
    AlreadyRunning,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::TaskPanicked => write!(f, "fin task panicked"),
            Self::DrivePoisoned => write!(f, "fin drive poisoned"),
            Self::AlreadyRunning => write!(f, "fin already running"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Pin number is not a usable BCM GPIO.
    InvalidPin(u8),
    /// Pin is already claimed by this session.
    AlreadyClaimed(u8),
    /// Exporting the pin to userspace failed.
    ExportFailed(u8),
    /// Setting the pin direction failed.
    DirectionFailed(u8),
    /// Writing the pin level failed.
    WriteFailed(u8),
    /// Handing the pin back to the kernel failed.
    UnexportFailed(u8),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(p) => write!(f, "invalid pin {p}"),
            Self::AlreadyClaimed(p) => write!(f, "pin {p} already claimed"),
            Self::ExportFailed(p) => write!(f, "export of pin {p} failed"),
            Self::DirectionFailed(p) => write!(f, "direction of pin {p} failed"),
            Self::WriteFailed(p) => write!(f, "write to pin {p} failed"),
            Self::UnexportFailed(p) => write!(f, "unexport of pin {p} failed"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

/// Pin errors surface through `embedded-hal` as well.
impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
