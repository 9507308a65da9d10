//! Tracing setup. Output goes to a file because the terminal belongs to
//! the UI while the app is running.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is not set, e.g. `fs_academia=info`
pub fn default_filter(level: &str) -> String {
    format!("fs_academia={level},sqlx=warn")
}

/// Install the global subscriber, appending to `log_file`.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless;
/// the second subscriber is ignored.
pub fn init_logging(log_file: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(file)),
    );

    let _ = subscriber.try_init();
    Ok(())
}
