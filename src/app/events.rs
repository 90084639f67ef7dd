//! Outbound application events.
//!
//! The experiment core emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them: print to the console, append to the run's
//! CSV file, etc.

use crate::drivers::fin::FinId;
use crate::fsm::StateId;

/// Structured events emitted by the experiment core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The phase machine has started (carries initial state).
    Started(StateId),

    /// One photodiode poll.
    Reading(Reading),

    /// The phase machine moved between states.
    StateChanged { from: StateId, to: StateId },

    /// All fin threads are up.
    FinsLaunched(usize),

    /// A fin was told to stop.
    FinStopped(FinId),

    /// GPIO pins were handed back to the system.
    PinsReleased,
}

/// A single photodiode sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Phase the reading was taken in.
    pub phase: StateId,
    pub brightness: u16,
    /// Time since the service started.
    pub elapsed_us: u64,
}
