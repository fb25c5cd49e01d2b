use crate::app_dirs::AppDirs;
use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `TYPEMASTER_LOG=debug`
pub const LOG_ENV: &str = "TYPEMASTER_LOG";

/// Send logs to `typemaster.log` in the state directory.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// Without a state directory logging stays off.
pub fn init() -> Result<()> {
    match AppDirs::log_path() {
        Some(path) => init_at(&path),
        None => Ok(()),
    }
}

pub fn init_at(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // a second init (tests, restarts) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}
