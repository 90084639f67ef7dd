//! Experiment service: the hexagonal core.
//!
//! [`ExperimentService`] owns the phase FSM and its context.  All I/O flows
//! through port traits passed in at call sites, so the whole service runs
//! against mock adapters in tests.
//!
//! ```text
//!  LightSensorPort ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                      │  ExperimentService   │
//!    IndicatorPort ◀── │  FSM (Idle/Active)   │ ◀── Clock
//!                      └──────────────────────┘
//! ```
//!
//! Polling order per tick mirrors the two loops of the experiment:
//! Idle polls first and then checks the threshold (so the reading that
//! ends idle is logged), Active checks the clock first and only polls
//! while time remains (so a zero-length run polls nothing).

use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::{AppEvent, Reading};
use super::ports::{Clock, EventSink, IndicatorPort, LightSensorPort};

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub idle_polls: u64,
    pub active_polls: u64,
    pub last_brightness: Option<u16>,
    /// Measured length of the active phase.
    pub active_duration: Duration,
}

/// The experiment service orchestrates the phase logic.
pub struct ExperimentService {
    fsm: Fsm,
    ctx: FsmContext,
    started: bool,
    started_at_us: u64,
    state_entered_us: u64,
    summary: RunSummary,
}

impl ExperimentService {
    /// Construct the service.  Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: ExperimentConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: FsmContext::new(config),
            started: false,
            started_at_us: 0,
            state_entered_us: 0,
            summary: RunSummary::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in Idle.  Calling it again is a no-op.
    pub fn start(&mut self, clock: &impl Clock, sink: &mut impl EventSink) {
        if self.started {
            return;
        }
        self.started = true;
        self.started_at_us = clock.uptime_us();
        self.state_entered_us = self.started_at_us;
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
    }

    /// Run one cycle: (poll) → FSM → indicator → (poll).
    pub fn tick(
        &mut self,
        hw: &mut (impl LightSensorPort + IndicatorPort),
        clock: &impl Clock,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let prev_state = self.fsm.current_state();
        if prev_state == StateId::Finished {
            return Ok(());
        }

        if prev_state == StateId::Idle {
            self.poll(hw, clock, sink, StateId::Idle)?;
        }

        let now = clock.uptime_us();
        self.ctx.elapsed_in_state =
            Duration::from_micros(now.saturating_sub(self.state_entered_us));
        self.fsm.tick(&mut self.ctx);

        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            self.on_transition(prev_state, new_state, now);
            self.apply_indicator(hw)?;
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        } else if new_state == StateId::Active {
            self.poll(hw, clock, sink, StateId::Active)?;
        }
        Ok(())
    }

    /// Start if needed and tick until the run is over, sleeping
    /// `poll_interval_ms` between ticks.
    pub fn run_until_finished(
        &mut self,
        hw: &mut (impl LightSensorPort + IndicatorPort),
        clock: &impl Clock,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<RunSummary> {
        self.start(clock, sink);
        let interval_ms = self.ctx.config.poll_interval_ms;

        while !self.is_finished() {
            self.tick(hw, clock, sink)?;
            if interval_ms > 0 && !self.is_finished() {
                delay.delay_ms(interval_ms);
            }
        }

        info!(
            "Run finished: {} idle polls, {} active polls, active for {:.2}s",
            self.summary.idle_polls,
            self.summary.active_polls,
            self.summary.active_duration.as_secs_f32()
        );
        Ok(self.summary)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn is_finished(&self) -> bool {
        self.state() == StateId::Finished
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn poll(
        &mut self,
        hw: &mut impl LightSensorPort,
        clock: &impl Clock,
        sink: &mut impl EventSink,
        phase: StateId,
    ) -> Result<()> {
        let brightness = hw.update()?;
        self.ctx.sensors.brightness = Some(brightness);
        self.summary.last_brightness = Some(brightness);
        match phase {
            StateId::Idle => self.summary.idle_polls += 1,
            _ => self.summary.active_polls += 1,
        }

        sink.emit(&AppEvent::Reading(Reading {
            phase,
            brightness,
            elapsed_us: clock.uptime_us().saturating_sub(self.started_at_us),
        }));
        Ok(())
    }

    fn on_transition(&mut self, from: StateId, to: StateId, now_us: u64) {
        if from == StateId::Active {
            self.summary.active_duration =
                Duration::from_micros(now_us.saturating_sub(self.state_entered_us));
        }
        log::debug!("{} -> {} at {}us", from.label(), to.label(), now_us);
        self.state_entered_us = now_us;
        self.ctx.elapsed_in_state = Duration::ZERO;
    }

    /// Translate the FSM indicator command into a port call.
    fn apply_indicator(&self, hw: &mut impl IndicatorPort) -> Result<()> {
        match (self.ctx.commands.indicator_on, hw.is_on()) {
            (true, false) => hw.on(),
            (false, true) => hw.off(),
            _ => Ok(()),
        }
    }
}
