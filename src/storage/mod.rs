//! Index file, marker snapshots and the services that expose them.

pub mod error;
pub mod index_file;
pub mod service;
pub mod snapshot;

pub use error::{StorageError, StorageResult};
pub use index_file::{IndexStats, SENTINEL};
pub use service::{DEFAULT_SERVICE, FileIndexService, IndexService, ServiceRegistry};
pub use snapshot::{HistoryLoad, MarkerStore, SkippedSnapshot};
