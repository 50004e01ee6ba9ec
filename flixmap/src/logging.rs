//! File logging. The terminal belongs to the UI, so logs never go to stdout.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber appending to `path`. `RUST_LOG` wins over
/// `default_level` when set.
pub fn init(path: &Path, default_level: &str) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
