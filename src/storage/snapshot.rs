//! Append-only store of marker snapshots, one file per pass.

use super::error::{StorageError, StorageResult};
use crate::config::MarkersConfig;
use crate::indexing::{MarkerHistory, MarkerSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A snapshot file that could not be loaded.
#[derive(Debug, Clone)]
pub struct SkippedSnapshot {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading the snapshot directory.
#[derive(Debug, Clone, Default)]
pub struct HistoryLoad {
    pub history: MarkerHistory,
    pub skipped: Vec<SkippedSnapshot>,
}

#[derive(Debug, Clone)]
pub struct MarkerStore {
    directory: PathBuf,
    extension: String,
}

impl MarkerStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            extension: "markers".to_string(),
        }
    }

    pub fn from_config(config: &MarkersConfig) -> Self {
        Self::new(&config.directory).with_extension(&config.extension)
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Write `markers` as a new snapshot. Empty sets are not written.
    pub fn persist(&self, markers: &MarkerSet) -> StorageResult<Option<PathBuf>> {
        if markers.is_empty() {
            return Ok(None);
        }

        std::fs::create_dir_all(&self.directory).map_err(|e| {
            StorageError::io(format!("creating {}", self.directory.display()), e)
        })?;

        let json = serde_json::to_vec_pretty(markers).map_err(|source| StorageError::Serialization {
            context: "encoding marker snapshot".to_string(),
            source,
        })?;

        let mut temp = NamedTempFile::new_in(&self.directory).map_err(|e| {
            StorageError::io(format!("creating temp file in {}", self.directory.display()), e)
        })?;
        temp.write_all(&json)
            .map_err(|e| StorageError::io("writing marker snapshot", e))?;

        // Random names can collide; retry with a fresh one.
        loop {
            let path = self.snapshot_path(rand::random::<u64>());
            match temp.persist_noclobber(&path) {
                Ok(_) => {
                    tracing::debug!("[markers] persisted snapshot {}", path.display());
                    return Ok(Some(path));
                }
                Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    temp = e.file;
                }
                Err(e) => {
                    return Err(StorageError::io(
                        format!("persisting snapshot {}", path.display()),
                        e.error,
                    ));
                }
            }
        }
    }

    /// Load every snapshot in the directory. A missing directory is an empty
    /// history; unreadable or malformed snapshots are skipped.
    pub fn load_all(&self) -> StorageResult<HistoryLoad> {
        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HistoryLoad::default()),
            Err(e) => {
                return Err(StorageError::io(
                    format!("listing {}", self.directory.display()),
                    e,
                ));
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == self.extension.as_str()))
            .collect();
        paths.sort();

        let mut load = HistoryLoad::default();
        for path in paths {
            match read_snapshot(&path) {
                Ok(snapshot) => load.history.push(snapshot),
                Err(reason) => {
                    tracing::warn!("[markers] skipping snapshot {}: {reason}", path.display());
                    load.skipped.push(SkippedSnapshot { path, reason });
                }
            }
        }

        tracing::debug!(
            "[markers] loaded {} snapshots from {} ({} skipped)",
            load.history.len(),
            self.directory.display(),
            load.skipped.len()
        );
        Ok(load)
    }

    fn snapshot_path(&self, id: u64) -> PathBuf {
        self.directory.join(format!("{id:016x}.{}", self.extension))
    }
}

fn read_snapshot(path: &Path) -> Result<MarkerSet, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}
