//! File logging.
//!
//! stdout belongs to the wheel, so nothing is logged unless
//! `ROULETTE_LOG_FILE` names a file. The level filter comes from
//! `ROULETTE_LOG` (`EnvFilter` syntax, default `info`).

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{Result, RouletteError};

pub const LOG_FILE_ENV: &str = "ROULETTE_LOG_FILE";
pub const LOG_FILTER_ENV: &str = "ROULETTE_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the subscriber described by the environment.
///
/// Returns whether a subscriber was installed.
pub fn init_from_env() -> Result<bool> {
    let path = std::env::var(LOG_FILE_ENV).ok();
    let filter = std::env::var(LOG_FILTER_ENV).ok();
    init(path.as_deref(), filter.as_deref())
}

/// Install a fmt subscriber appending to `path`. `None` or an empty path
/// disables logging.
pub fn init(path: Option<&str>, filter: Option<&str>) -> Result<bool> {
    let Some(path) = path.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| RouletteError::LogFile {
            path: path.to_string(),
            source,
        })?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(path, "logging started");
    }
    Ok(installed)
}

/// Parse `filter`, falling back to the default level when it is missing or invalid.
#[must_use]
pub fn env_filter(filter: Option<&str>) -> EnvFilter {
    filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
