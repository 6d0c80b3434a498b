//! One build pass, end to end.
//!
//! Load prior markers, gather seeds, collect, merge records into the index,
//! then persist this pass's markers. Markers are written last so a pass
//! that fails part way leaves no snapshot behind.

use super::collector::Collector;
use super::seeds::SeedConfig;
use super::universe::ElementUniverse;
use crate::config::Settings;
use crate::error::IndexResult;
use crate::record::Record;
use crate::storage::{IndexStats, MarkerStore, ServiceRegistry, SkippedSnapshot};
use crate::{debug_event, log_event};
use std::path::PathBuf;

/// Outcome of one pass.
#[derive(Debug, Clone, Default)]
pub struct PassStats {
    /// Records the collector emitted this pass.
    pub records_emitted: usize,
    /// Index contents after the merge; `None` if nothing was written.
    pub index: Option<IndexStats>,
    /// Snapshot written for this pass, if any markers were new.
    pub snapshot: Option<PathBuf>,
    /// Prior snapshots consulted.
    pub prior_snapshots: usize,
    /// Prior snapshots that could not be read.
    pub skipped_snapshots: Vec<SkippedSnapshot>,
}

pub struct IndexPass {
    settings: Settings,
    registry: ServiceRegistry,
}

impl IndexPass {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            registry: ServiceRegistry::new(),
        }
    }

    pub fn with_registry(mut self, registry: ServiceRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Inline seeds from the settings merged with the seed file, if one is set.
    ///
    /// Entries with line breaks are rejected here, before anything is written.
    pub fn seeds(&self) -> IndexResult<SeedConfig> {
        let mut seeds = self.settings.collector.inline_seeds();
        if let Some(path) = &self.settings.collector.seed_file {
            let from_file = SeedConfig::load(path)?;
            debug_event!(
                "pass",
                "seed file",
                "{}: {} annotations, {} interfaces, {} classes, {} aliased ids",
                path.display(),
                from_file.annotations.len(),
                from_file.interfaces.len(),
                from_file.classes.len(),
                from_file.aliases.len()
            );
            seeds.merge(from_file);
        }
        seeds.validate()?;
        Ok(seeds)
    }

    pub fn run(&self, universe: &ElementUniverse) -> IndexResult<PassStats> {
        let store = MarkerStore::from_config(&self.settings.markers);
        let load = store.load_all()?;
        let seeds = self.seeds()?;

        let collection = Collector::new(&self.settings.collector, &seeds, &load.history).collect(universe)?;

        let mut stats = PassStats {
            records_emitted: collection.len(),
            prior_snapshots: load.history.len(),
            skipped_snapshots: load.skipped,
            ..Default::default()
        };

        if !collection.is_empty() {
            let service = self.registry.get(&self.settings.service)?;
            let records: Vec<Record> = collection.records.into_values().collect();
            stats.index = Some(service.write(&self.settings.index_path, &records)?);
        }

        stats.snapshot = store.persist(&collection.markers)?;

        log_event!(
            "pass",
            "finished",
            "{} of {} elements emitted, {} prior snapshots, new snapshot: {}",
            stats.records_emitted,
            universe.len(),
            stats.prior_snapshots,
            stats.snapshot.is_some()
        );
        Ok(stats)
    }

    /// Records currently in the index that satisfy `predicate`.
    pub fn query(&self, predicate: &dyn Fn(&Record) -> bool) -> IndexResult<Vec<Record>> {
        let service = self.registry.get(&self.settings.service)?;
        Ok(service.read(&self.settings.index_path, predicate)?)
    }
}
