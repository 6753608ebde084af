use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by manuscript loading, analysis output and style sheet persistence.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("manuscript file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("style sheet {} is corrupt: {source}", path.display())]
    CorruptStyleSheet {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
