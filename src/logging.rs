/// Tracing setup. The terminal belongs to the renderer, so log lines go
/// to a file and never to stdout/stderr.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::Level;

use crate::config::LogConfig;
use crate::error::{GameError, GameResult};

/// Install the global subscriber. Returns an error if the log file can't
/// be opened; the caller decides whether to carry on without logs.
pub fn init(cfg: &LogConfig) -> GameResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.file)
        .map_err(|source| GameError::LogFile { path: cfg.file.clone(), source })?;

    let level = cfg.level.parse::<Level>().unwrap_or(Level::INFO);

    // A second init (tests, restarts) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init();
    Ok(())
}
