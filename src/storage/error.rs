use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error while {context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("Corrupt index file {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    #[error("Serialization error while {context}: {source}")]
    Serialization {
        context: String,
        source: serde_json::Error,
    },

    #[error("Cannot store {value:?}: index entries may not contain line breaks")]
    LineBreakInValue { value: String },

    #[error("No index service registered under '{0}'")]
    UnknownService(String),
}

impl StorageError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptIndex {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
