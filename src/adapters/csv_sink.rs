//! CSV recorder for photodiode readings.
//!
//! Appends one row per [`AppEvent::Reading`] to `photodiode.csv` in the run
//! directory.  Other events are ignored.  Write failures are logged and
//! swallowed: losing the recording must not stop the fins mid-run.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub const CSV_FILE_NAME: &str = "photodiode.csv";

pub struct CsvEventSink {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
}

impl CsvEventSink {
    /// Create `photodiode.csv` in `run_dir` and write the header row.
    pub fn create(run_dir: &Path) -> Result<Self, csv::Error> {
        let path = run_dir.join(CSV_FILE_NAME);
        let mut writer = csv::Writer::from_writer(File::create(&path)?);
        writer.write_record(["elapsed_s", "phase", "brightness"])?;
        writer.flush()?;
        info!("CSV recorder writing to '{}'", path.display());
        Ok(Self {
            path,
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                warn!("CSV flush failed: {}", e);
            }
        }
    }
}

impl EventSink for CsvEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reading(r) => {
                let Some(writer) = self.writer.as_mut() else {
                    return;
                };
                let elapsed_s = r.elapsed_us as f64 / 1_000_000.0;
                let row = [
                    format!("{elapsed_s:.6}"),
                    r.phase.label().to_string(),
                    r.brightness.to_string(),
                ];
                if let Err(e) = writer.write_record(&row) {
                    warn!("CSV write failed, recording stopped: {}", e);
                    self.writer = None;
                }
            }
            AppEvent::StateChanged { .. } | AppEvent::PinsReleased => self.flush(),
            _ => {}
        }
    }
}

impl Drop for CsvEventSink {
    fn drop(&mut self) {
        self.flush();
    }
}
