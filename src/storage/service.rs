//! Query-facing index services.

use super::error::{StorageError, StorageResult};
use super::index_file::{self, IndexStats};
use crate::record::Record;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Id the registry falls back to when no service is named.
pub const DEFAULT_SERVICE: &str = "file";

/// Reads and writes records at a location.
pub trait IndexService: Send + Sync {
    /// Every stored record matching `predicate`, in stored order.
    fn read(&self, location: &Path, predicate: &dyn Fn(&Record) -> bool) -> StorageResult<Vec<Record>>;

    /// Merge `records` into the index at `location`. A record replaces any
    /// stored record with the same id.
    fn write(&self, location: &Path, records: &[Record]) -> StorageResult<IndexStats>;
}

/// Index service backed by the line-oriented index file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileIndexService;

impl FileIndexService {
    pub fn new() -> Self {
        Self
    }
}

impl IndexService for FileIndexService {
    fn read(&self, location: &Path, predicate: &dyn Fn(&Record) -> bool) -> StorageResult<Vec<Record>> {
        let records = index_file::read_records(location)?;
        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }

    fn write(&self, location: &Path, records: &[Record]) -> StorageResult<IndexStats> {
        let mut merged: BTreeMap<String, Record> = index_file::read_records(location)?
            .into_iter()
            .map(|r| (r.id(), r))
            .collect();
        let existing = merged.len();

        for record in records {
            merged.insert(record.id(), record.clone());
        }

        tracing::debug!(
            "[index] merging {} records into {} existing at {}",
            records.len(),
            existing,
            location.display()
        );
        index_file::write_records(location, merged.values())
    }
}

/// Index services by id.
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn IndexService>>,
}

impl ServiceRegistry {
    /// Registry with no services at all.
    pub fn empty() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Registry with the file service registered as the default.
    pub fn new() -> Self {
        Self::empty().with_service(DEFAULT_SERVICE, Arc::new(FileIndexService::new()))
    }

    pub fn with_service(mut self, id: impl Into<String>, service: Arc<dyn IndexService>) -> Self {
        self.register(id, service);
        self
    }

    /// Register `service` under `id`, returning the service it replaced.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        service: Arc<dyn IndexService>,
    ) -> Option<Arc<dyn IndexService>> {
        self.services.insert(id.into(), service)
    }

    pub fn get(&self, id: &str) -> StorageResult<Arc<dyn IndexService>> {
        self.services
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::UnknownService(id.to_string()))
    }

    pub fn default_service(&self) -> StorageResult<Arc<dyn IndexService>> {
        self.get(DEFAULT_SERVICE)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.services.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.ids())
            .finish()
    }
}
