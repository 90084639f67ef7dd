//! Integration tests for the ExperimentService → FSM → indicator pipeline.
//!
//! Drives the Idle → Active → Finished machine with scripted photodiode
//! readings and a stepping clock.

use std::time::Duration;

use fishfood::app::events::AppEvent;
use fishfood::app::service::ExperimentService;
use fishfood::config::ExperimentConfig;
use fishfood::error::{Error, SensorError};
use fishfood::fsm::StateId;

use crate::mock_hw::{Call, CallLog, FakeClock, MockHardware, NoopDelay, RecordingSink};

fn config(run_duration_secs: u32) -> ExperimentConfig {
    ExperimentConfig {
        run_duration_secs,
        poll_interval_ms: 0,
        ..ExperimentConfig::default()
    }
}

// ── Idle trigger ─────────────────────────────────────────────

#[test]
fn idle_exits_on_fourth_poll() {
    let log = CallLog::default();
    // No hold value: a fifth read would fail the run.
    let mut hw = MockHardware::new([60, 55, 51, 49], None, &log);
    let mut sink = RecordingSink::new();
    let mut service = ExperimentService::new(config(0));

    let summary = service
        .run_until_finished(&mut hw, &FakeClock::new(1_000), &mut NoopDelay, &mut sink)
        .unwrap();

    assert_eq!(summary.idle_polls, 4);
    assert_eq!(summary.last_brightness, Some(49));
    assert_eq!(hw.polls, 4);
    let idle: Vec<u16> = sink.readings().iter().map(|r| r.brightness).collect();
    assert_eq!(idle, [60, 55, 51, 49]);
}

#[test]
fn reading_equal_to_threshold_ends_idle() {
    let log = CallLog::default();
    let mut hw = MockHardware::new([51, 50], None, &log);
    let mut service = ExperimentService::new(config(0));

    let summary = service
        .run_until_finished(
            &mut hw,
            &FakeClock::new(1_000),
            &mut NoopDelay,
            &mut RecordingSink::new(),
        )
        .unwrap();
    assert_eq!(summary.idle_polls, 2);
}

// ── Active phase ─────────────────────────────────────────────

#[test]
fn zero_duration_skips_active_polling() {
    let log = CallLog::default();
    let mut hw = MockHardware::new([10], None, &log);
    let mut service = ExperimentService::new(config(0));

    let summary = service
        .run_until_finished(
            &mut hw,
            &FakeClock::new(1_000),
            &mut NoopDelay,
            &mut RecordingSink::new(),
        )
        .unwrap();

    assert_eq!(summary.active_polls, 0);
    assert!(service.is_finished());
}

#[test]
fn active_never_ends_early() {
    let log = CallLog::default();
    let mut hw = MockHardware::new([400, 2], Some(2), &log);
    let mut sink = RecordingSink::new();
    let mut service = ExperimentService::new(config(1));

    let summary = service
        .run_until_finished(&mut hw, &FakeClock::new(50_000), &mut NoopDelay, &mut sink)
        .unwrap();

    assert!(summary.active_duration >= Duration::from_secs(1));
    assert!(summary.active_polls > 0);

    // One reading per poll, labelled with the phase it was taken in.
    let readings = sink.readings();
    assert_eq!(readings.len() as u64, summary.idle_polls + summary.active_polls);
    assert!(readings[..2].iter().all(|r| r.phase == StateId::Idle));
    assert!(readings[2..].iter().all(|r| r.phase == StateId::Active));
    assert!(readings.windows(2).all(|w| w[0].elapsed_us < w[1].elapsed_us));
}

#[test]
fn indicator_lit_for_active_phase_only() {
    let log = CallLog::default();
    let mut hw = MockHardware::new([3], Some(3), &log);
    let mut sink = RecordingSink::new();
    let mut service = ExperimentService::new(config(1));

    service
        .run_until_finished(&mut hw, &FakeClock::new(100_000), &mut NoopDelay, &mut sink)
        .unwrap();

    let indicator: Vec<Call> = log
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::IndicatorOn | Call::IndicatorOff))
        .collect();
    assert_eq!(indicator, [Call::IndicatorOn, Call::IndicatorOff]);

    let transitions: Vec<(StateId, StateId)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        [
            (StateId::Idle, StateId::Active),
            (StateId::Active, StateId::Finished)
        ]
    );
}

#[test]
fn sensor_failure_propagates() {
    let log = CallLog::default();
    let mut hw = MockHardware::new([400], None, &log);
    let mut service = ExperimentService::new(config(1));

    let err = service
        .run_until_finished(
            &mut hw,
            &FakeClock::new(1_000),
            &mut NoopDelay,
            &mut RecordingSink::new(),
        )
        .unwrap_err();
    assert_eq!(err, Error::Sensor(SensorError::AdcReadFailed));
    assert_eq!(service.state(), StateId::Idle);
}
