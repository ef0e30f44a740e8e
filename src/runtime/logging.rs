use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILENAME: &str = "jukebox.log";
const LOG_ENV: &str = "JUKEBOX_LOG";

/// Route `tracing` output to `<data_dir>/jukebox.log`; the terminal belongs to the TUI.
///
/// The filter comes from `JUKEBOX_LOG` and defaults to `info`.
pub fn init(data_dir: &Path) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILENAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()?;

    Ok(log_path)
}
