//! fishfood experiment controller library.
//!
//! Exposes every module for integration testing.  The binary in `main.rs`
//! only wires adapters together.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod sensors;
