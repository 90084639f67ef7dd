//! Concrete state handler functions and table builder.
//!
//! ```text
//!  IDLE ──[brightness <= threshold]──▶ ACTIVE ──[elapsed >= duration]──▶ FINISHED
//! ```
//!
//! The indicator is lit for the whole active phase so the camera footage
//! can be cut to the run.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use log::info;

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1: Active
        StateDescriptor {
            id: StateId::Active,
            name: "Active",
            on_enter: Some(active_enter),
            on_exit: Some(active_exit),
            on_update: active_update,
        },
        // Index 2: Finished
        StateDescriptor {
            id: StateId::Finished,
            name: "Finished",
            on_enter: Some(finished_enter),
            on_exit: None,
            on_update: finished_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE: waiting for the lights to go off
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut FsmContext) {
    ctx.commands.indicator_on = false;
    info!(
        "IDLE: waiting for brightness <= {}",
        ctx.config.brightness_threshold
    );
}

fn idle_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.lights_off() {
        return Some(StateId::Active);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE: timed run
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter(ctx: &mut FsmContext) {
    ctx.commands.indicator_on = true;
    info!(
        "ACTIVE: trigger at brightness {:?}, running {}s",
        ctx.sensors.brightness, ctx.config.run_duration_secs
    );
}

fn active_exit(ctx: &mut FsmContext) {
    ctx.commands.indicator_on = false;
}

fn active_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.run_elapsed() {
        return Some(StateId::Finished);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FINISHED: terminal
// ═══════════════════════════════════════════════════════════════════════════

fn finished_enter(ctx: &mut FsmContext) {
    info!("FINISHED: run complete after {} ticks", ctx.total_ticks);
}

fn finished_update(_ctx: &mut FsmContext) -> Option<StateId> {
    None
}
