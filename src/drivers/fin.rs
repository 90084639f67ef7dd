//! Fin coil driver.
//!
//! Each fin is an electromagnet actuator wired across two GPIOs.  Driving
//! pin A high / pin B low pulls the fin one way, the reverse pulls it the
//! other way; alternating at the configured frequency makes it oscillate.
//!
//! The drive loop is meant to own a dedicated thread (see
//! [`FinFleet`](crate::app::lifecycle::FinFleet)).  [`FinActuator::terminate`]
//! may be called from any thread; the loop checks it at least every
//! [`STOP_POLL_NS`] and leaves both pins low on exit.

use core::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, info};

use crate::app::ports::FinActuator;
use crate::drivers::task::StopFlag;
use crate::error::{ActuatorError, Error, GpioError, Result};

/// Longest uninterrupted sleep inside the drive loop.
pub const STOP_POLL_NS: u32 = 10_000_000;

/// The four fins of the fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinId {
    Caudal,
    Dorsal,
    PectoralLeft,
    PectoralRight,
}

impl FinId {
    pub const COUNT: usize = 4;

    /// Launch and stop order.
    pub const ALL: [FinId; Self::COUNT] = [
        Self::Caudal,
        Self::Dorsal,
        Self::PectoralLeft,
        Self::PectoralRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Caudal => "caudal",
            Self::Dorsal => "dorsal",
            Self::PectoralLeft => "pectoral_left",
            Self::PectoralRight => "pectoral_right",
        }
    }

    pub fn thread_name(self) -> &'static str {
        match self {
            Self::Caudal => "fin-caudal",
            Self::Dorsal => "fin-dorsal",
            Self::PectoralLeft => "fin-pectoral-l",
            Self::PectoralRight => "fin-pectoral-r",
        }
    }
}

impl fmt::Display for FinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct FinDrive<P, D> {
    pin_a: P,
    pin_b: P,
    delay: D,
}

impl<P, D> FinDrive<P, D>
where
    P: OutputPin<Error = GpioError>,
    D: DelayNs,
{
    /// `true` = A high / B low, `false` = A low / B high.
    fn stroke(&mut self, forward: bool) -> Result<()> {
        // Release the active side first so both coils are never high together.
        if forward {
            self.pin_b.set_low()?;
            self.pin_a.set_high()?;
        } else {
            self.pin_a.set_low()?;
            self.pin_b.set_high()?;
        }
        Ok(())
    }

    fn rest(&mut self) -> Result<()> {
        self.pin_a.set_low()?;
        self.pin_b.set_low()?;
        Ok(())
    }

    /// Sleep `ns`, waking early if a stop is requested.
    fn wait(&mut self, mut ns: u64, stop: &StopFlag) {
        while ns > 0 && !stop.is_requested() {
            let slice = ns.min(u64::from(STOP_POLL_NS)) as u32;
            self.delay.delay_ns(slice);
            ns -= u64::from(slice);
        }
    }
}

/// One fin: two coil pins and a drive frequency.
pub struct Fin<P, D> {
    id: FinId,
    freq_hz: f32,
    drive: Mutex<FinDrive<P, D>>,
    stop: StopFlag,
    running: AtomicBool,
}

impl<P, D> Fin<P, D>
where
    P: OutputPin<Error = GpioError>,
    D: DelayNs,
{
    /// Build a fin.  Both pins are driven low immediately.
    pub fn new(id: FinId, mut pin_a: P, mut pin_b: P, freq_hz: f32, delay: D) -> Result<Self> {
        if freq_hz.is_nan() || freq_hz <= 0.0 {
            return Err(Error::Config("fin frequency must be positive"));
        }
        pin_a.set_low()?;
        pin_b.set_low()?;
        Ok(Self {
            id,
            freq_hz,
            drive: Mutex::new(FinDrive {
                pin_a,
                pin_b,
                delay,
            }),
            stop: StopFlag::new(),
            running: AtomicBool::new(false),
        })
    }

    pub fn freq_hz(&self) -> f32 {
        self.freq_hz
    }

    /// Time spent in each stroke direction.
    pub fn half_period_ns(&self) -> u64 {
        (1.0e9_f32 / (2.0 * self.freq_hz)).round() as u64
    }

    pub fn is_terminated(&self) -> bool {
        self.stop.is_requested()
    }

    fn oscillate(&self, drive: &mut FinDrive<P, D>) -> Result<u64> {
        let half = self.half_period_ns();
        let mut strokes = 0u64;
        while !self.stop.is_requested() {
            let forward = strokes % 2 == 0;
            drive.stroke(forward)?;
            strokes += 1;
            drive.wait(half, &self.stop);
        }
        Ok(strokes)
    }
}

impl<P, D> FinActuator for Fin<P, D>
where
    P: OutputPin<Error = GpioError> + Send + 'static,
    D: DelayNs + Send + 'static,
{
    fn id(&self) -> FinId {
        self.id
    }

    fn run(&self) -> Result<()> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(ActuatorError::AlreadyRunning.into());
        }
        let mut drive = self
            .drive
            .lock()
            .map_err(|_| Error::from(ActuatorError::DrivePoisoned))?;

        info!("{}: driving at {:.1} Hz", self.id, self.freq_hz);
        let result = self.oscillate(&mut drive);
        let rested = drive.rest();
        self.running.store(false, Ordering::Release);

        let strokes = result?;
        rested?;
        debug!("{}: stopped after {} strokes", self.id, strokes);
        Ok(())
    }

    fn terminate(&self) {
        self.stop.request();
    }
}
