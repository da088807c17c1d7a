//! Error types for persisted data and assets
//!
//! Nothing here is fatal to a session: loaders that face the game loop
//! degrade to empty data and log, and keep these errors for callers that
//! want to inspect the failure.

use crate::board::Hex;
use std::path::PathBuf;

/// Failure reading a persisted terrain or roster document
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid coordinate key {0:?} (expected \"q,r\")")]
    InvalidCoordinate(String),

    #[error("invalid wall between {a:?} and {b:?}: cells must be adjacent and on the board")]
    InvalidWall { a: Hex, b: Hex },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure loading a single image asset
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("no image path given")]
    MissingPath,

    #[error("failed to load image {path}: {message}")]
    Load { path: PathBuf, message: String },
}
