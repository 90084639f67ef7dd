//! Photodiode brightness sensor.
//!
//! The photodiode is read through a voltage divider into an ADC.  Typical
//! readings in the test tank: ~2 counts with the room lights off, ~400 with
//! them on.  The driver keeps only the latest reading.
//!
//! ## Dual-target design
//!
//! On the fish: reads an [`IioAdc`](crate::adapters::iio_adc::IioAdc).
//! On host/simulation: reads a [`ScriptedAdc`].

use std::collections::VecDeque;

use crate::error::SensorError;
use crate::sensors::AdcChannel;

pub struct Photodiode<A> {
    adc: A,
    brightness: u16,
}

impl<A: AdcChannel> Photodiode<A> {
    pub fn new(adc: A) -> Self {
        Self {
            adc,
            brightness: 0,
        }
    }

    /// Take a fresh reading and return it.
    pub fn update(&mut self) -> Result<u16, SensorError> {
        self.brightness = self.adc.read_raw()?;
        Ok(self.brightness)
    }

    /// Latest reading (0 before the first update).
    pub fn brightness(&self) -> u16 {
        self.brightness
    }
}

// ───────────────────────────────────────────────────────────────
// Scripted source (simulation)
// ───────────────────────────────────────────────────────────────

/// ADC that replays a fixed list of readings and then holds a final value.
#[derive(Debug, Clone)]
pub struct ScriptedAdc {
    script: VecDeque<u16>,
    hold: u16,
}

impl ScriptedAdc {
    pub fn new(script: impl IntoIterator<Item = u16>, hold: u16) -> Self {
        Self {
            script: script.into_iter().collect(),
            hold,
        }
    }

    /// Lights on for `polls` readings, then lights off for good.
    pub fn lights_off_after(polls: u32) -> Self {
        const LIGHTS_ON: u16 = 400;
        const LIGHTS_OFF: u16 = 2;
        Self::new(
            core::iter::repeat_n(LIGHTS_ON, polls as usize),
            LIGHTS_OFF,
        )
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl AdcChannel for ScriptedAdc {
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        Ok(self.script.pop_front().unwrap_or(self.hold))
    }
}
