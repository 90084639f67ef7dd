//! fishfood: photodiode-triggered swim experiment.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  SysfsGpio / SimGpio   IioAdc / ScriptedAdc   JsonConfigFile │
//! │  (GpioBank)            (AdcChannel)           (ConfigPort)   │
//! │  HardwareAdapter       LogEventSink + CsvEventSink           │
//! │  (Sensor+Indicator)    (EventSink)                           │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │   lifecycle::run_experiment                          │    │
//! │  │   FinFleet · ExperimentService (Idle → Active FSM)   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::info;

use fishfood::adapters::config_file::JsonConfigFile;
use fishfood::adapters::csv_sink::CsvEventSink;
use fishfood::adapters::hardware::HardwareAdapter;
use fishfood::adapters::iio_adc::IioAdc;
use fishfood::adapters::log_sink::LogEventSink;
use fishfood::adapters::run_dir;
use fishfood::adapters::sysfs_gpio::SysfsGpio;
use fishfood::adapters::time::{MonotonicClock, StdDelay};
use fishfood::app::lifecycle;
use fishfood::app::ports::ConfigPort;
use fishfood::app::service::RunSummary;
use fishfood::config::{ExperimentConfig, FinConfig};
use fishfood::drivers::fin::{Fin, FinId};
use fishfood::drivers::gpio::{GpioBank, GpioSession, SimGpio};
use fishfood::drivers::status_led::{ActiveLevel, StatusLed};
use fishfood::sensors::AdcChannel;
use fishfood::sensors::photodiode::{Photodiode, ScriptedAdc};

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    // ── 2. Configuration ──────────────────────────────────────
    let store = JsonConfigFile::from_env();
    let config = store
        .load()
        .with_context(|| format!("loading config from '{}'", store.path().display()))?;

    // ── 3. Output directory (before touching any hardware) ────
    let id = run_dir::run_id(&Local::now());
    let out_dir = run_dir::create_run_dir(&config.output_root, &id)
        .with_context(|| format!("creating run directory '{}'", id))?;

    // ── 4. Backend selection + run ────────────────────────────
    let summary = if config.simulate {
        info!("Simulation mode: lights go off after {} polls", config.sim_light_polls);
        run_with(
            &config,
            &out_dir,
            SimGpio::new(),
            ScriptedAdc::lights_off_after(config.sim_light_polls),
        )?
    } else {
        run_with(
            &config,
            &out_dir,
            SysfsGpio::new(&config.gpio_root),
            IioAdc::new(&config.photodiode_adc_path),
        )?
    };

    info!(
        "Done: {} idle polls, {} active polls over {:.1}s",
        summary.idle_polls,
        summary.active_polls,
        summary.active_duration.as_secs_f64()
    );
    Ok(())
}

fn build_fin<B: GpioBank>(
    gpio: &mut GpioSession<B>,
    id: FinId,
    cfg: &FinConfig,
) -> fishfood::error::Result<Fin<B::Pin, StdDelay>> {
    let pin_a = gpio.claim_output(cfg.pin_a)?;
    let pin_b = gpio.claim_output(cfg.pin_b)?;
    Fin::new(id, pin_a, pin_b, cfg.freq_hz, StdDelay)
}

/// Claim pins, build drivers, and run one experiment on the given backend.
fn run_with<B, A>(config: &ExperimentConfig, out_dir: &Path, bank: B, adc: A) -> Result<RunSummary>
where
    B: GpioBank,
    A: AdcChannel,
{
    let mut gpio = GpioSession::new(bank);
    let fins = [
        build_fin(&mut gpio, FinId::Caudal, &config.fins.caudal)?,
        build_fin(&mut gpio, FinId::Dorsal, &config.fins.dorsal)?,
        build_fin(&mut gpio, FinId::PectoralLeft, &config.fins.pectoral_left)?,
        build_fin(&mut gpio, FinId::PectoralRight, &config.fins.pectoral_right)?,
    ];
    let led = StatusLed::new(gpio.claim_output(config.indicator_gpio)?, ActiveLevel::High)?;
    let mut hw = HardwareAdapter::new(Photodiode::new(adc), led);

    let csv = if config.record_csv {
        Some(CsvEventSink::create(out_dir).context("creating photodiode.csv")?)
    } else {
        None
    };
    let mut sink = (LogEventSink::new(), csv);

    let clock = MonotonicClock::new();
    let mut delay = StdDelay;
    let summary =
        lifecycle::run_experiment(config, gpio, fins, &mut hw, &clock, &mut delay, &mut sink)?;
    Ok(summary)
}
