use std::fs::OpenOptions;

use tracing::Level;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::error::Result;

/// Install a file-backed tracing subscriber when a log file is configured.
///
/// The terminal belongs to the UI, so nothing is ever logged to stdout or
/// stderr. Without a log file no subscriber is installed and the `tracing`
/// macros are no-ops. The returned [`WorkerGuard`] must live until exit so the
/// background writer flushes.
pub fn init_tracing(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let Some(path) = settings.log_file.as_ref() else {
        return Ok(None);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = non_blocking(file);

    // RUST_LOG wins; otherwise the configured level, defaulting to INFO.
    let default_level = settings
        .log_level
        .as_deref()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(env_filter)
        .try_init();

    Ok(Some(guard))
}
