//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade.  Readings are printed as `idle <b>` / `active <b>`, one
//! line per poll, which is the operator's live view of the photodiode.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reading(r) => {
                info!("{} {}", r.phase.label(), r.brightness);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::FinsLaunched(n) => {
                info!("FINS  | {} running", n);
            }
            AppEvent::FinStopped(id) => {
                info!("FINS  | {} stopped", id);
            }
            AppEvent::PinsReleased => {
                info!("GPIO  | pins released");
            }
        }
    }
}
