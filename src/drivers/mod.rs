//! Actuator drivers, pin reservation, and thread helpers.

pub mod fin;
pub mod gpio;
pub mod status_led;
pub mod task;
