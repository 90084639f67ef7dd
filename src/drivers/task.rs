//! Named thread spawning and cooperative stop flags for fin tasks.
//!
//! Every fin runs its drive loop on its own OS thread.  Threads are named
//! after the fin so that `top -H` and panic messages say which fin is
//! misbehaving, and are given an explicit stack size.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::error::{Error, Result};

/// Stack size for fin drive threads.  The drive loop holds almost nothing.
pub const FIN_STACK_KB: usize = 64;

/// Spawn a named thread with an explicit stack size.
pub fn spawn_named<T, F>(name: &str, stack_kb: usize, f: F) -> Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    log::debug!("Spawning '{}' (stack={}KB)", name, stack_kb);

    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|e| {
            log::error!("spawn '{}' failed: {}", name, e);
            Error::Init("thread creation failed")
        })
}

/// One-way stop request shared between a fin thread and its owner.
///
/// Requesting twice is harmless.
#[derive(Debug, Default)]
pub struct StopFlag(AtomicBool);

impl StopFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
