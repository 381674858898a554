//! Crate-level error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::cfr::config::ConfigError;

/// Errors surfaced by configuration loading, parsing and checkpoint I/O.
///
/// The training core itself is infallible; only the edges of the crate
/// (files, user-supplied strings) return these.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// File could not be read or written.
    #[error("failed to access {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The rayon worker pool could not be started.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Card text was not of the form `As`, `Td`, `2c`.
    #[error("cannot parse card {0:?}")]
    CardParse(String),

    /// History text contained a symbol other than `r`, `c` or `f`.
    #[error("unknown action symbol {0:?} in history")]
    HistoryParse(char),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
