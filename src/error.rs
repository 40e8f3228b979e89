//! Crate-wide error type

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced outside the per-tick simulation.
///
/// Nothing inside a tick can fail; these come from startup and from the
/// high-score / settings files.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("high score file {path} does not contain a whole number: {contents:?}")]
    ParseScore { path: PathBuf, contents: String },

    #[error("invalid settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to load asset {path}: {reason}")]
    Asset { path: String, reason: String },

    #[error("no user data directory could be determined")]
    NoDataDir,
}

impl GameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
