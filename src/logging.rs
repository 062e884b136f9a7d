//! Tracing subscriber setup
//!
//! The TUI owns the terminal, so interactive sessions log to a file under
//! the config directory; headless runs log to stderr.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

pub const LOG_FILE_NAME: &str = "tailor-fit.log";

pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// `<config dir>/tailor-fit/tailor-fit.log`, or the temp dir if there is no config dir.
    pub fn default_file() -> Self {
        let dir = crate::config::Config::config_dir().unwrap_or_else(std::env::temp_dir);
        LogTarget::File(dir.join(LOG_FILE_NAME))
    }
}

pub fn level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the global subscriber. Returns the log file path when logging to a file.
pub fn init(verbose: bool, target: LogTarget) -> Result<Option<PathBuf>> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level(verbose))
        .with_target(false);

    match target {
        LogTarget::Stderr => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let file = open_log_file(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;
            Ok(Some(path))
        }
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
