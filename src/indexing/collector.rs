//! Fixed-point discovery of indexed elements for one build pass.
//!
//! ```text
//! TAGS ──► INTERFACES ──► CLASSES ──► ALIASES ──► PRUNE
//!   ▲  │       ▲   │  non-final ▲  │
//!   └──┘       └───┘  classes ──┘  └─ (self-loop until no growth)
//! ```
//!
//! - **TAGS**: elements carrying a seed tag; annotation types found this way
//!   seed the next round.
//! - **INTERFACES**: types directly implementing a seed interface; found
//!   interfaces extend the seed, found non-final classes feed CLASSES.
//! - **CLASSES**: classes whose immediate superclass is a seed; non-final
//!   ones extend the seed.
//! - **ALIASES**: elements named in the alias map are emitted with their aliases.
//! - **PRUNE**: markers earlier passes already persisted are dropped.

use super::markers::{MarkerHistory, MarkerSet};
use super::seeds::SeedConfig;
use super::universe::{Element, ElementUniverse};
use super::{CollectError, CollectResult};
use crate::config::CollectorConfig;
use crate::record::Record;
use crate::types::TypeKind;
use std::collections::{BTreeMap, BTreeSet};

/// Output of one collection run.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Emitted records keyed by id.
    pub records: BTreeMap<String, Record>,
    /// Markers to persist for later passes (already pruned).
    pub markers: MarkerSet,
}

impl Collection {
    pub fn ids(&self) -> BTreeSet<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct Collector<'a> {
    config: &'a CollectorConfig,
    seeds: &'a SeedConfig,
    history: &'a MarkerHistory,
}

/// Mutable state of a single run.
struct PassState {
    records: BTreeMap<String, Record>,
    markers: MarkerSet,
    aliases: BTreeMap<String, BTreeSet<String>>,
}

impl PassState {
    /// Record an element. Returns `false` if it has no qualified name.
    fn emit(&mut self, element: &Element) -> bool {
        let Some(mut record) = element.to_record() else {
            return false;
        };
        let id = record.id();
        if let Some(aliases) = self.aliases.get(&id) {
            record.attributes_mut().aliases.extend(aliases.iter().cloned());
        }
        self.records.insert(id, record);
        true
    }
}

impl<'a> Collector<'a> {
    pub fn new(config: &'a CollectorConfig, seeds: &'a SeedConfig, history: &'a MarkerHistory) -> Self {
        Self {
            config,
            seeds,
            history,
        }
    }

    /// Run every discovery loop over `universe`.
    pub fn collect(&self, universe: &ElementUniverse) -> CollectResult<Collection> {
        let mut aliases = self.history.aliases();
        for (id, names) in &self.seeds.aliases {
            aliases.entry(id.clone()).or_default().extend(names.iter().cloned());
        }

        let mut state = PassState {
            records: BTreeMap::new(),
            markers: MarkerSet::new(),
            aliases,
        };

        self.propagate_tags(universe, &mut state)?;
        self.propagate_interfaces(universe, &mut state);
        self.propagate_subclasses(universe, &mut state);
        self.attach_aliases(universe, &mut state);

        let emitted = state.records.len();
        let mut markers = state.markers;
        markers.prune(self.history, &self.config.bootstrap_tag);

        tracing::debug!(
            "[collector] emitted {emitted} records; persisting {} tags, {} interfaces, {} classes, {} aliased ids",
            markers.tags.len(),
            markers.interfaces.len(),
            markers.classes.len(),
            markers.aliases.len()
        );

        Ok(Collection {
            records: state.records,
            markers,
        })
    }

    fn propagate_tags(&self, universe: &ElementUniverse, state: &mut PassState) -> CollectResult<()> {
        let mut seed: BTreeSet<String> = BTreeSet::new();
        seed.insert(self.config.bootstrap_tag.clone());
        seed.extend(self.seeds.annotations.iter().cloned());
        seed.extend(self.history.tags());

        state.markers.tags.extend(seed.iter().cloned());
        let mut visited = seed.clone();
        // Levels of nested tag declarations found so far.
        let mut depth = 0usize;

        while !seed.is_empty() {
            let mut nested = BTreeSet::new();
            for element in universe.iter() {
                if !element.tags().iter().any(|t| seed.contains(t)) {
                    continue;
                }
                if !state.emit(element) {
                    continue;
                }
                if let Some(tag) = element.declared_tag() {
                    if visited.insert(tag.to_string()) {
                        nested.insert(tag.to_string());
                    }
                }
            }

            if !nested.is_empty() {
                depth += 1;
                if depth > self.config.max_tag_depth {
                    return Err(CollectError::TagNestingTooDeep {
                        limit: self.config.max_tag_depth,
                        pending: nested.into_iter().collect(),
                    });
                }
                tracing::trace!("[collector] tag level {depth}: nested tags {nested:?}");
            }
            state.markers.tags.extend(nested.iter().cloned());
            seed = nested;
        }

        Ok(())
    }

    fn propagate_interfaces(&self, universe: &ElementUniverse, state: &mut PassState) {
        let mut seed: BTreeSet<String> = self.seeds.interfaces.clone();
        seed.extend(self.history.interfaces());
        state.markers.interfaces.extend(seed.iter().cloned());

        let mut frontier = seed.clone();
        while !frontier.is_empty() {
            let mut found = BTreeSet::new();
            for (name, ty) in universe.types() {
                if !ty.interfaces.iter().any(|i| frontier.contains(i)) {
                    continue;
                }
                state.emit(&Element::Type(ty.clone()));

                if ty.kind == TypeKind::Interface {
                    if !seed.contains(name) {
                        found.insert(name.to_string());
                    }
                } else if ty.is_extensible_class() {
                    state.markers.classes.insert(name.to_string());
                }
            }

            seed.extend(found.iter().cloned());
            state.markers.interfaces.extend(found.iter().cloned());
            frontier = found;
        }
    }

    fn propagate_subclasses(&self, universe: &ElementUniverse, state: &mut PassState) {
        let mut seed: BTreeSet<String> = self.seeds.classes.clone();
        seed.extend(self.history.classes());
        seed.extend(state.markers.classes.iter().cloned());
        state.markers.classes.extend(seed.iter().cloned());

        let mut frontier = seed.clone();
        while !frontier.is_empty() {
            let mut found = BTreeSet::new();
            for (name, ty) in universe.types() {
                let Some(parent) = ty.immediate_superclass() else {
                    continue;
                };
                if !frontier.contains(parent) {
                    continue;
                }
                state.emit(&Element::Type(ty.clone()));

                if ty.is_extensible_class() && !seed.contains(name) {
                    found.insert(name.to_string());
                }
            }

            seed.extend(found.iter().cloned());
            state.markers.classes.extend(found.iter().cloned());
            frontier = found;
        }
    }

    fn attach_aliases(&self, universe: &ElementUniverse, state: &mut PassState) {
        for (id, names) in &self.seeds.aliases {
            state.markers.add_aliases(id.clone(), names.iter().cloned());
        }
        if state.aliases.is_empty() {
            return;
        }

        for element in universe.iter() {
            let Some(record) = element.to_record() else {
                continue;
            };
            if state.aliases.contains_key(&record.id()) {
                state.emit(element);
            }
        }
    }
}
