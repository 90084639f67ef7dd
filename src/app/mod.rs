//! Application core: experiment logic, zero direct I/O.
//!
//! This module contains the rules of a swim experiment: the phase FSM
//! orchestration, fin thread lifecycle, and teardown ordering.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod lifecycle;
pub mod ports;
pub mod service;
