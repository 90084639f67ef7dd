//! Port traits: the hexagonal boundary between the experiment logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ExperimentService / lifecycle (domain)
//! ```
//!
//! Driven adapters (photodiode, indicator, fins, clock, event sinks,
//! config storage) implement these traits.  The domain core consumes them
//! via generics, so it never touches a GPIO or file directly.

use crate::config::ExperimentConfig;
use crate::drivers::fin::FinId;
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Light sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the trigger photodiode.
pub trait LightSensorPort {
    /// Refresh the reading and return it.
    fn update(&mut self) -> Result<u16>;

    /// Latest reading.
    fn brightness(&self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the indicator LED.
pub trait IndicatorPort {
    fn on(&mut self) -> Result<()>;

    fn off(&mut self) -> Result<()>;

    fn is_on(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Fin actuator port
// ───────────────────────────────────────────────────────────────

/// A fin that oscillates on its own thread.
///
/// `run` blocks until `terminate` is called from another thread.
/// `terminate` must be safe to call more than once and must make `run`
/// return promptly.
pub trait FinActuator: Send + Sync + 'static {
    fn id(&self) -> FinId;

    fn run(&self) -> Result<()>;

    fn terminate(&self);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source for the active-phase timer.
pub trait Clock {
    /// Microseconds since the clock was created (monotonic).
    fn uptime_us(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / recording)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (console, CSV file).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Fan an event out to two sinks.
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &super::events::AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

/// An absent sink drops everything.
impl<S: EventSink> EventSink for Option<S> {
    fn emit(&mut self, event: &super::events::AppEvent) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists experiment configuration.
///
/// Implementations MUST validate before returning or persisting and reject
/// invalid ranges with [`ConfigError::ValidationFailed`] rather than
/// clamping them.
pub trait ConfigPort {
    /// Load configuration.
    /// Returns [`ExperimentConfig::default()`] if no stored config exists.
    fn load(&self) -> core::result::Result<ExperimentConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ExperimentConfig) -> core::result::Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config could not be parsed.
    Corrupted(String),
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Underlying storage I/O failed.
    Io(std::io::Error),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
