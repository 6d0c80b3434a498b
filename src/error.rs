//! Crate-level error type.

use crate::indexing::{CollectError, SeedParseError};
use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Collection failed: {0}")]
    Collect(#[from] CollectError),

    #[error("Invalid seed configuration: {0}")]
    Seeds(#[from] SeedParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl IndexError {
    /// Hints for the user, shown next to the error message.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            IndexError::Storage(StorageError::CorruptIndex { .. }) => vec![
                "Delete the index file; the next full build recreates it",
                "Check that no other tool writes to the index path",
            ],
            IndexError::Storage(StorageError::UnknownService(_)) => {
                vec!["Set `service = \"file\"` in .typeindex/settings.toml"]
            }
            IndexError::Storage(StorageError::LineBreakInValue { .. }) => {
                vec!["Remove line breaks from names and aliases in collector settings"]
            }
            IndexError::Storage(_) => vec!["Check permissions on the index and markers directories"],
            IndexError::Collect(CollectError::TagNestingTooDeep { .. }) => vec![
                "Raise collector.max_tag_depth",
                "Look for tag declarations that tag each other in a chain",
            ],
            IndexError::Seeds(SeedParseError::LineBreak { .. }) => {
                vec!["Seed entries and aliases must fit on one line; check collector.aliases in .typeindex/settings.toml"]
            }
            IndexError::Seeds(SeedParseError::Io { .. }) => {
                vec!["Check collector.seed_file in .typeindex/settings.toml"]
            }
            IndexError::Config(_) => vec!["Check .typeindex/settings.toml and TI_* environment variables"],
        }
    }
}

pub type IndexResult<T> = Result<T, IndexError>;
