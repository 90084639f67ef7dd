//! GPIO pin reservation.
//!
//! A [`GpioBank`] hands out output pins and gives them back to the system
//! in one go.  The [`GpioSession`] wrapper owns the bank for the whole
//! process: it refuses double claims and guarantees the bank is released
//! exactly once, either through [`GpioSession::release`] or on drop.
//!
//! ## Dual-target design
//!
//! On the fish: [`SysfsGpio`](crate::adapters::sysfs_gpio::SysfsGpio).
//! On host/simulation: [`SimGpio`] tracks pin levels in memory only.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin};
use heapless::Vec;
use log::{info, warn};

use crate::error::{GpioError, Result};
use crate::pins::MAX_BCM_GPIO;

const PIN_SLOTS: usize = MAX_BCM_GPIO as usize + 1;

/// Source of output pins.
pub trait GpioBank {
    type Pin: OutputPin<Error = GpioError> + Send + 'static;

    /// Reserve `gpio` as an output, initially low.
    fn claim_output(&mut self, gpio: u8) -> Result<Self::Pin>;

    /// Hand every pin claimed so far back to the system.
    fn release_all(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// GpioSession
// ───────────────────────────────────────────────────────────────

/// Process-wide owner of the pin table.
pub struct GpioSession<B: GpioBank> {
    bank: B,
    claimed: Vec<u8, PIN_SLOTS>,
    released: bool,
}

impl<B: GpioBank> GpioSession<B> {
    pub fn new(bank: B) -> Self {
        Self {
            bank,
            claimed: Vec::new(),
            released: false,
        }
    }

    pub fn claim_output(&mut self, gpio: u8) -> Result<B::Pin> {
        if gpio > MAX_BCM_GPIO {
            return Err(GpioError::InvalidPin(gpio).into());
        }
        if self.claimed.contains(&gpio) {
            return Err(GpioError::AlreadyClaimed(gpio).into());
        }
        let pin = self.bank.claim_output(gpio)?;
        self.claimed
            .push(gpio)
            .map_err(|_| GpioError::InvalidPin(gpio))?;
        Ok(pin)
    }

    /// Pins claimed so far, in claim order.
    pub fn claimed(&self) -> &[u8] {
        &self.claimed
    }

    /// Release every claimed pin.  Consumes the session, so it can only happen once.
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.bank.release_all()?;
        info!("GPIO: released {} pins", self.claimed.len());
        Ok(())
    }
}

impl<B: GpioBank> Drop for GpioSession<B> {
    fn drop(&mut self) {
        if !self.released {
            warn!("GPIO session dropped without release, releasing now");
            if let Err(e) = self.release_inner() {
                warn!("GPIO release on drop failed: {}", e);
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Simulation bank
// ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct SimGpioState {
    levels: [AtomicBool; PIN_SLOTS],
    edges: [AtomicU32; PIN_SLOTS],
    claimed: AtomicU32,
    releases: AtomicU32,
}

/// In-memory GPIO bank.  Clones share the same pin table.
#[derive(Debug, Clone)]
pub struct SimGpio {
    state: Arc<SimGpioState>,
}

impl SimGpio {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SimGpioState {
                levels: core::array::from_fn(|_| AtomicBool::new(false)),
                edges: core::array::from_fn(|_| AtomicU32::new(0)),
                claimed: AtomicU32::new(0),
                releases: AtomicU32::new(0),
            }),
        }
    }

    /// Current level of `gpio`.
    pub fn level(&self, gpio: u8) -> bool {
        self.state.levels[gpio as usize].load(Ordering::Acquire)
    }

    /// Number of level changes seen on `gpio`.
    pub fn edges(&self, gpio: u8) -> u32 {
        self.state.edges[gpio as usize].load(Ordering::Acquire)
    }

    pub fn is_claimed(&self, gpio: u8) -> bool {
        self.state.claimed.load(Ordering::Acquire) & (1 << gpio) != 0
    }

    /// How many times `release_all` ran.
    pub fn release_count(&self) -> u32 {
        self.state.releases.load(Ordering::Acquire)
    }
}

impl Default for SimGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioBank for SimGpio {
    type Pin = SimPin;

    fn claim_output(&mut self, gpio: u8) -> Result<SimPin> {
        if gpio > MAX_BCM_GPIO {
            return Err(GpioError::InvalidPin(gpio).into());
        }
        self.state.claimed.fetch_or(1 << gpio, Ordering::AcqRel);
        self.state.levels[gpio as usize].store(false, Ordering::Release);
        Ok(SimPin {
            gpio,
            state: Arc::clone(&self.state),
        })
    }

    fn release_all(&mut self) -> Result<()> {
        self.state.claimed.store(0, Ordering::Release);
        self.state.releases.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

/// Output pin backed by [`SimGpio`].
#[derive(Debug)]
pub struct SimPin {
    gpio: u8,
    state: Arc<SimGpioState>,
}

impl SimPin {
    fn set(&mut self, high: bool) {
        let idx = self.gpio as usize;
        if self.state.levels[idx].swap(high, Ordering::AcqRel) != high {
            self.state.edges[idx].fetch_add(1, Ordering::AcqRel);
        }
    }
}

impl ErrorType for SimPin {
    type Error = GpioError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), GpioError> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), GpioError> {
        self.set(true);
        Ok(())
    }
}
