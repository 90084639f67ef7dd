//! Experiment lifecycle: fin threads, ready/exit flashes, pin release.
//!
//! ```text
//!  initialize ──▶ ExperimentService::run_until_finished ──▶ terminate
//!   │ launch 4 fin threads                                   │ stop 4 fins, join
//!   │ flash on/off                                           │ flash on/off
//!                                                            │ release pins
//! ```
//!
//! [`FinFleet`] keeps one join handle per fin thread.  If it is dropped
//! without [`FinFleet::shutdown`] (early return, panic unwinding) it still
//! stops and joins every fin, so no thread is left driving hardware.

use std::sync::Arc;
use std::thread::JoinHandle;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{error, info, warn};

use crate::config::ExperimentConfig;
use crate::drivers::fin::FinId;
use crate::drivers::gpio::{GpioBank, GpioSession};
use crate::drivers::task::{self, FIN_STACK_KB};
use crate::error::{ActuatorError, Error, Result};

use super::events::AppEvent;
use super::ports::{Clock, EventSink, FinActuator, IndicatorPort, LightSensorPort};
use super::service::{ExperimentService, RunSummary};

// ───────────────────────────────────────────────────────────────
// FinFleet
// ───────────────────────────────────────────────────────────────

struct RunningFin<A> {
    fin: Arc<A>,
    handle: Option<JoinHandle<Result<()>>>,
}

/// Owner of the fin threads.
pub struct FinFleet<A: FinActuator> {
    fins: Vec<RunningFin<A>, { FinId::COUNT }>,
}

impl<A: FinActuator> FinFleet<A> {
    /// Start one thread per fin and return without waiting on them.
    pub fn launch(fins: [A; FinId::COUNT]) -> Result<Self> {
        let mut fleet = Self { fins: Vec::new() };
        for fin in fins {
            let fin = Arc::new(fin);
            let worker = Arc::clone(&fin);
            let handle =
                task::spawn_named(fin.id().thread_name(), FIN_STACK_KB, move || worker.run())?;
            if fleet
                .fins
                .push(RunningFin {
                    fin,
                    handle: Some(handle),
                })
                .is_err()
            {
                return Err(Error::Init("more fins than slots"));
            }
        }
        info!("Launched {} fin threads", fleet.count());
        Ok(fleet)
    }

    /// Number of running fins.
    pub fn count(&self) -> usize {
        self.fins.len()
    }

    /// Fins in launch order.
    pub fn ids(&self) -> impl Iterator<Item = FinId> + '_ {
        self.fins.iter().map(|f| f.fin.id())
    }

    /// Signal every fin to stop, in launch order.  Does not wait.
    pub fn stop_all(&self, sink: &mut impl EventSink) {
        for running in &self.fins {
            running.fin.terminate();
            sink.emit(&AppEvent::FinStopped(running.fin.id()));
        }
    }

    /// Wait for every fin thread.  All threads are joined even if one
    /// failed; the first failure is returned.
    pub fn join_all(&mut self) -> Result<()> {
        let mut first = Ok(());
        for running in &mut self.fins {
            let Some(handle) = running.handle.take() else {
                continue;
            };
            let outcome = handle
                .join()
                .unwrap_or_else(|_| Err(ActuatorError::TaskPanicked.into()));
            if let Err(e) = outcome {
                error!("{}: fin task failed: {}", running.fin.id(), e);
                if first.is_ok() {
                    first = Err(e);
                }
            }
        }
        first
    }

    /// Stop and join every fin.
    pub fn shutdown(mut self, sink: &mut impl EventSink) -> Result<()> {
        self.stop_all(sink);
        self.join_all()
    }
}

impl<A: FinActuator> Drop for FinFleet<A> {
    fn drop(&mut self) {
        if self.fins.iter().all(|f| f.handle.is_none()) {
            return;
        }
        warn!("Fin fleet dropped while running, stopping fins");
        for running in &self.fins {
            running.fin.terminate();
        }
        if let Err(e) = self.join_all() {
            warn!("Fin shutdown on drop: {}", e);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Phases
// ───────────────────────────────────────────────────────────────

fn flash(indicator: &mut impl IndicatorPort, delay: &mut impl DelayNs, flash_ms: u32) -> Result<()> {
    indicator.on()?;
    delay.delay_ms(flash_ms);
    indicator.off()
}

/// Launch the fins, then pulse the indicator on and off as a ready signal.
pub fn initialize<A: FinActuator>(
    fins: [A; FinId::COUNT],
    indicator: &mut impl IndicatorPort,
    delay: &mut impl DelayNs,
    flash_ms: u32,
    sink: &mut impl EventSink,
) -> Result<FinFleet<A>> {
    let fleet = FinFleet::launch(fins)?;
    sink.emit(&AppEvent::FinsLaunched(fleet.count()));

    flash(indicator, delay, flash_ms)?;
    delay.delay_ms(flash_ms);
    info!("Ready");
    Ok(fleet)
}

/// Stop every fin, flash the indicator, then release the pins.
///
/// Every step runs even if an earlier one failed; the first failure is
/// returned.
pub fn terminate<A: FinActuator, B: GpioBank>(
    fleet: FinFleet<A>,
    indicator: &mut impl IndicatorPort,
    delay: &mut impl DelayNs,
    flash_ms: u32,
    gpio: GpioSession<B>,
    sink: &mut impl EventSink,
) -> Result<()> {
    let joined = fleet.shutdown(sink);
    let flashed = flash(indicator, delay, flash_ms);
    let released = gpio.release();
    if released.is_ok() {
        sink.emit(&AppEvent::PinsReleased);
    }
    info!("Terminated");
    joined.and(flashed).and(released)
}

/// Full experiment: initialize, idle, active, terminate.
///
/// Teardown runs even when the run itself fails; the run error wins.
pub fn run_experiment<A, B, H>(
    config: &ExperimentConfig,
    gpio: GpioSession<B>,
    fins: [A; FinId::COUNT],
    hw: &mut H,
    clock: &impl Clock,
    delay: &mut impl DelayNs,
    sink: &mut impl EventSink,
) -> Result<RunSummary>
where
    A: FinActuator,
    B: GpioBank,
    H: LightSensorPort + IndicatorPort,
{
    config.validate().map_err(Error::Config)?;
    let fleet = initialize(fins, hw, delay, config.flash_ms, sink)?;

    let mut service = ExperimentService::new(config.clone());
    let run = service.run_until_finished(hw, clock, delay, sink);
    if let Err(e) = &run {
        error!("Run aborted: {}", e);
    }

    let teardown = terminate(fleet, hw, delay, config.flash_ms, gpio, sink);
    match (run, teardown) {
        (Ok(summary), Ok(())) => Ok(summary),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(te)) => {
            error!("Teardown also failed: {}", te);
            Err(e)
        }
        (Ok(_), Err(te)) => Err(te),
    }
}
