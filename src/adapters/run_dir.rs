//! Per-run output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// Folder name for a run started at `at`, e.g. `2024-05-01_14-03-22`.
pub fn run_id<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Create `root/id`.  `root` is created if needed; `id` must not exist yet.
pub fn create_run_dir(root: &Path, id: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(root)?;
    let dir = root.join(id);
    fs::create_dir(&dir)?;
    log::info!("Run directory '{}'", dir.display());
    Ok(dir)
}
