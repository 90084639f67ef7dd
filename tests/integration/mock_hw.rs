//! Mock hardware for integration tests.
//!
//! Fins, pin bank, photodiode and indicator all append to one shared
//! [`CallLog`] so tests can assert on the global order of operations.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use fishfood::app::events::AppEvent;
use fishfood::app::ports::{Clock, EventSink, FinActuator, IndicatorPort, LightSensorPort};
use fishfood::drivers::fin::FinId;
use fishfood::drivers::gpio::{GpioBank, SimGpio, SimPin};
use fishfood::error::{Result, SensorError};

// ── Shared call log ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    FinStarted(FinId),
    FinTerminated(FinId),
    FinReturned(FinId),
    IndicatorOn,
    IndicatorOff,
    Polled,
    PinsReleased,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

#[allow(dead_code)]
impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, call: Call) -> Option<usize> {
        self.calls().iter().position(|c| *c == call)
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }
}

// ── MockFin ──────────────────────────────────────────────────

pub enum FinBehaviour {
    /// Spin until terminated.
    Normal,
    /// Panic as soon as the thread starts.
    Panic,
}

pub struct MockFin {
    id: FinId,
    stop: AtomicBool,
    log: CallLog,
    behaviour: FinBehaviour,
}

impl MockFin {
    pub fn new(id: FinId, log: &CallLog) -> Self {
        Self::with_behaviour(id, log, FinBehaviour::Normal)
    }

    pub fn with_behaviour(id: FinId, log: &CallLog, behaviour: FinBehaviour) -> Self {
        Self {
            id,
            stop: AtomicBool::new(false),
            log: log.clone(),
            behaviour,
        }
    }
}

impl FinActuator for MockFin {
    fn id(&self) -> FinId {
        self.id
    }

    fn run(&self) -> Result<()> {
        self.log.push(Call::FinStarted(self.id));
        if let FinBehaviour::Panic = self.behaviour {
            panic!("{} coil shorted", self.id);
        }
        while !self.stop.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(1));
        }
        self.log.push(Call::FinReturned(self.id));
        Ok(())
    }

    fn terminate(&self) {
        self.log.push(Call::FinTerminated(self.id));
        self.stop.store(true, Ordering::Release);
    }
}

pub fn four_fins(log: &CallLog) -> [MockFin; FinId::COUNT] {
    FinId::ALL.map(|id| MockFin::new(id, log))
}

// ── MockGpio ─────────────────────────────────────────────────

/// [`SimGpio`] that also records the release in the call log.
pub struct MockGpio {
    pub sim: SimGpio,
    log: CallLog,
}

impl MockGpio {
    pub fn new(log: &CallLog) -> Self {
        Self {
            sim: SimGpio::new(),
            log: log.clone(),
        }
    }
}

impl GpioBank for MockGpio {
    type Pin = SimPin;

    fn claim_output(&mut self, gpio: u8) -> Result<SimPin> {
        self.sim.claim_output(gpio)
    }

    fn release_all(&mut self) -> Result<()> {
        self.log.push(Call::PinsReleased);
        self.sim.release_all()
    }
}

// ── MockHardware (photodiode + indicator) ────────────────────

pub struct MockHardware {
    readings: VecDeque<u16>,
    /// Returned once the script is exhausted.
    hold: Option<u16>,
    last: u16,
    indicator: bool,
    pub polls: usize,
    log: CallLog,
}

#[allow(dead_code)]
impl MockHardware {
    /// Replays `readings`, then keeps returning `hold`.  With `hold = None`
    /// the sensor fails once the script runs out.
    pub fn new(readings: impl IntoIterator<Item = u16>, hold: Option<u16>, log: &CallLog) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            hold,
            last: 0,
            indicator: false,
            polls: 0,
            log: log.clone(),
        }
    }
}

impl LightSensorPort for MockHardware {
    fn update(&mut self) -> Result<u16> {
        self.polls += 1;
        self.log.push(Call::Polled);
        let value = match self.readings.pop_front().or(self.hold) {
            Some(v) => v,
            None => return Err(SensorError::AdcReadFailed.into()),
        };
        self.last = value;
        Ok(value)
    }

    fn brightness(&self) -> u16 {
        self.last
    }
}

impl IndicatorPort for MockHardware {
    fn on(&mut self) -> Result<()> {
        self.indicator = true;
        self.log.push(Call::IndicatorOn);
        Ok(())
    }

    fn off(&mut self) -> Result<()> {
        self.indicator = false;
        self.log.push(Call::IndicatorOff);
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.indicator
    }
}

// ── Time ─────────────────────────────────────────────────────

/// Clock that advances `step_us` every time it is read.
pub struct FakeClock {
    now: Cell<u64>,
    step_us: u64,
}

impl FakeClock {
    pub fn new(step_us: u64) -> Self {
        Self {
            now: Cell::new(0),
            step_us,
        }
    }
}

impl Clock for FakeClock {
    fn uptime_us(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t + self.step_us);
        t
    }
}

/// Delay that returns immediately.
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ── Event recorder ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings(&self) -> Vec<fishfood::app::events::Reading> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Reading(r) => Some(*r),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
