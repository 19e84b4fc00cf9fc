//! File logging. The terminal belongs to the sky map, so nothing is written
//! to stdout or stderr while it runs.
//!
//! `ORRERY_LOG` holds an `EnvFilter` directive (`debug`, `orrery=trace`, ...).
//! When it is unset or empty no subscriber is installed.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "ORRERY_LOG";

/// Returns whether a subscriber was installed.
pub(crate) fn init(log_path: &Path) -> Result<bool> {
    let Some(filter) = filter_from_env() else {
        return Ok(false);
    };
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(true)
}

fn filter_from_env() -> Option<EnvFilter> {
    let directives = std::env::var(LOG_ENV).ok().filter(|v| !v.trim().is_empty())?;
    // an unparseable directive still turns logging on, at info
    Some(EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info")))
}
