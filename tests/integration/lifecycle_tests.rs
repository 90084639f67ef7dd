//! Integration tests for fin thread lifecycle and teardown ordering.

use std::time::{Duration, Instant};

use fishfood::app::events::AppEvent;
use fishfood::app::lifecycle::{self, FinFleet};
use fishfood::config::ExperimentConfig;
use fishfood::drivers::fin::FinId;
use fishfood::drivers::gpio::GpioSession;
use fishfood::error::{ActuatorError, Error, SensorError};

use crate::mock_hw::{
    Call, CallLog, FakeClock, FinBehaviour, MockFin, MockGpio, MockHardware, NoopDelay,
    RecordingSink, four_fins,
};

fn config() -> ExperimentConfig {
    ExperimentConfig {
        run_duration_secs: 0,
        poll_interval_ms: 0,
        ..ExperimentConfig::default()
    }
}

/// Wait until `n` entries of `call` are in the log, or give up after 2 s.
fn wait_for(log: &CallLog, n: usize, call: impl Fn(&Call) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if log.calls().iter().filter(|c| call(*c)).count() >= n {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    false
}

// ── Launch ───────────────────────────────────────────────────

#[test]
fn launch_starts_four_threads_without_blocking() {
    let log = CallLog::default();
    let fleet = FinFleet::launch(four_fins(&log)).unwrap();
    assert_eq!(fleet.count(), 4);
    assert_eq!(fleet.ids().collect::<Vec<_>>(), FinId::ALL);

    // All four run concurrently: none of them returns until stopped.
    assert!(wait_for(&log, 4, |c| matches!(c, Call::FinStarted(_))));
    assert_eq!(
        log.calls()
            .iter()
            .filter(|c| matches!(c, Call::FinReturned(_)))
            .count(),
        0
    );

    fleet.shutdown(&mut RecordingSink::new()).unwrap();
    for id in FinId::ALL {
        assert_eq!(log.count(Call::FinReturned(id)), 1);
    }
}

#[test]
fn dropped_fleet_still_joins_fins() {
    let log = CallLog::default();
    let fleet = FinFleet::launch(four_fins(&log)).unwrap();
    assert!(wait_for(&log, 4, |c| matches!(c, Call::FinStarted(_))));
    drop(fleet);

    for id in FinId::ALL {
        assert_eq!(log.count(Call::FinTerminated(id)), 1);
        assert_eq!(log.count(Call::FinReturned(id)), 1);
    }
}

// ── Full run ─────────────────────────────────────────────────

#[test]
fn terminate_stops_every_fin_before_releasing_pins() {
    let log = CallLog::default();
    let gpio = MockGpio::new(&log);
    let sim = gpio.sim.clone();
    let mut hw = MockHardware::new([60, 55, 51, 49], Some(3), &log);
    let mut sink = RecordingSink::new();

    let summary = lifecycle::run_experiment(
        &config(),
        GpioSession::new(gpio),
        four_fins(&log),
        &mut hw,
        &FakeClock::new(1_000),
        &mut NoopDelay,
        &mut sink,
    )
    .unwrap();
    assert_eq!(summary.idle_polls, 4);

    let released = log.position(Call::PinsReleased).unwrap();
    let stops: Vec<usize> = FinId::ALL
        .iter()
        .map(|id| log.position(Call::FinTerminated(*id)).unwrap())
        .collect();
    assert!(stops.windows(2).all(|w| w[0] < w[1]), "stop order {stops:?}");
    assert!(stops.iter().all(|&s| s < released));
    assert_eq!(log.count(Call::PinsReleased), 1);
    assert_eq!(sim.release_count(), 1);

    // Ready flash, active phase, exit flash.
    assert_eq!(log.count(Call::IndicatorOn), 3);
    let first_poll = log.position(Call::Polled).unwrap();
    let flash_on = log.position(Call::IndicatorOn).unwrap();
    let flash_off = log.position(Call::IndicatorOff).unwrap();
    assert!(
        flash_on < flash_off && flash_off < first_poll,
        "ready flash must finish before idle polling"
    );
    assert!(!hw_is_lit(&log));

    assert_eq!(sink.events.first(), Some(&AppEvent::FinsLaunched(4)));
    assert_eq!(sink.events.last(), Some(&AppEvent::PinsReleased));
}

fn hw_is_lit(log: &CallLog) -> bool {
    log.calls()
        .iter()
        .rev()
        .find_map(|c| match c {
            Call::IndicatorOn => Some(true),
            Call::IndicatorOff => Some(false),
            _ => None,
        })
        .unwrap_or(false)
}

#[test]
fn teardown_runs_when_sensor_fails() {
    let log = CallLog::default();
    let gpio = MockGpio::new(&log);
    let sim = gpio.sim.clone();
    let mut hw = MockHardware::new([400, 400], None, &log);

    let err = lifecycle::run_experiment(
        &config(),
        GpioSession::new(gpio),
        four_fins(&log),
        &mut hw,
        &FakeClock::new(1_000),
        &mut NoopDelay,
        &mut RecordingSink::new(),
    )
    .unwrap_err();

    assert_eq!(err, Error::Sensor(SensorError::AdcReadFailed));
    for id in FinId::ALL {
        assert_eq!(log.count(Call::FinTerminated(id)), 1);
        assert_eq!(log.count(Call::FinReturned(id)), 1);
    }
    assert_eq!(sim.release_count(), 1);
}

#[test]
fn panicking_fin_is_reported_after_full_teardown() {
    let log = CallLog::default();
    let gpio = MockGpio::new(&log);
    let sim = gpio.sim.clone();
    let mut hw = MockHardware::new([5], Some(5), &log);
    let fins = [
        MockFin::new(FinId::Caudal, &log),
        MockFin::with_behaviour(FinId::Dorsal, &log, FinBehaviour::Panic),
        MockFin::new(FinId::PectoralLeft, &log),
        MockFin::new(FinId::PectoralRight, &log),
    ];

    let err = lifecycle::run_experiment(
        &config(),
        GpioSession::new(gpio),
        fins,
        &mut hw,
        &FakeClock::new(1_000),
        &mut NoopDelay,
        &mut RecordingSink::new(),
    )
    .unwrap_err();

    assert_eq!(err, Error::Actuator(ActuatorError::TaskPanicked));
    for id in [FinId::Caudal, FinId::PectoralLeft, FinId::PectoralRight] {
        assert_eq!(log.count(Call::FinReturned(id)), 1);
    }
    assert_eq!(sim.release_count(), 1);
}

#[test]
fn invalid_config_refuses_to_start_fins() {
    let log = CallLog::default();
    let gpio = MockGpio::new(&log);
    let sim = gpio.sim.clone();
    let mut hw = MockHardware::new([5], Some(5), &log);
    let bad = ExperimentConfig {
        flash_ms: 0,
        ..config()
    };

    let err = lifecycle::run_experiment(
        &bad,
        GpioSession::new(gpio),
        four_fins(&log),
        &mut hw,
        &FakeClock::new(1_000),
        &mut NoopDelay,
        &mut RecordingSink::new(),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(!log.calls().iter().any(|c| matches!(c, Call::FinStarted(_))));
    // The session is dropped unreleased, which still hands the pins back.
    assert_eq!(sim.release_count(), 1);
}
