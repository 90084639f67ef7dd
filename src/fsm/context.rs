//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` holds the latest photodiode reading, the indicator command
//! written by the handlers, timing, and the configuration.  The service
//! fills in readings and elapsed time before each tick and applies the
//! commands after it.

use std::time::Duration;

use crate::config::ExperimentConfig;

/// Latest sensor state as seen by the handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightSnapshot {
    /// Most recent photodiode reading, `None` until the first poll.
    pub brightness: Option<u16>,
}

/// Commands that state handlers write to request actuator actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorCommand {
    pub indicator_on: bool,
}

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks since the machine started.
    pub total_ticks: u64,
    /// Wall-clock time since the current state was entered.
    pub elapsed_in_state: Duration,

    // -- Sensor data --
    pub sensors: LightSnapshot,

    // -- Actuator outputs --
    pub commands: IndicatorCommand,

    // -- Configuration --
    pub config: ExperimentConfig,
}

impl FsmContext {
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            total_ticks: 0,
            elapsed_in_state: Duration::ZERO,
            sensors: LightSnapshot::default(),
            commands: IndicatorCommand::default(),
            config,
        }
    }

    /// `true` once a reading at or below the threshold has been seen.
    pub fn lights_off(&self) -> bool {
        self.sensors
            .brightness
            .is_some_and(|b| b <= self.config.brightness_threshold)
    }

    /// `true` once the active phase has lasted the configured duration.
    pub fn run_elapsed(&self) -> bool {
        self.elapsed_in_state >= self.config.run_duration()
    }
}
