//! Scanned markers: what one pass expanded, and what earlier passes did.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Markers expanded during one build pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    pub tags: BTreeSet<String>,
    pub interfaces: BTreeSet<String>,
    pub classes: BTreeSet<String>,
    /// Element id → aliases.
    pub aliases: BTreeMap<String, BTreeSet<String>>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.interfaces.is_empty()
            && self.classes.is_empty()
            && self.aliases.is_empty()
    }

    pub fn add_aliases<S: Into<String>>(&mut self, id: impl Into<String>, aliases: impl IntoIterator<Item = S>) {
        self.aliases
            .entry(id.into())
            .or_default()
            .extend(aliases.into_iter().map(Into::into));
    }

    /// Drop everything earlier passes already recorded, plus the bootstrap tag.
    pub fn prune(&mut self, history: &MarkerHistory, bootstrap_tag: &str) {
        let tags = history.tags();
        let interfaces = history.interfaces();
        let classes = history.classes();
        let aliases = history.aliases();

        self.tags.retain(|t| t != bootstrap_tag && !tags.contains(t));
        self.interfaces.retain(|i| !interfaces.contains(i));
        self.classes.retain(|c| !classes.contains(c));
        self.aliases.retain(|id, names| {
            if let Some(known) = aliases.get(id) {
                names.retain(|n| !known.contains(n));
            }
            !names.is_empty()
        });
    }
}

/// Every marker snapshot persisted by earlier passes, kept unmerged.
///
/// Folding happens at the point of use through the accessor methods.
#[derive(Debug, Clone, Default)]
pub struct MarkerHistory {
    snapshots: Vec<MarkerSet>,
}

impl MarkerHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: MarkerSet) {
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[MarkerSet] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn tags(&self) -> BTreeSet<String> {
        self.fold(|s| &s.tags)
    }

    pub fn interfaces(&self) -> BTreeSet<String> {
        self.fold(|s| &s.interfaces)
    }

    pub fn classes(&self) -> BTreeSet<String> {
        self.fold(|s| &s.classes)
    }

    pub fn aliases(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut merged: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for snapshot in &self.snapshots {
            for (id, names) in &snapshot.aliases {
                merged
                    .entry(id.clone())
                    .or_default()
                    .extend(names.iter().cloned());
            }
        }
        merged
    }

    fn fold(&self, pick: impl Fn(&MarkerSet) -> &BTreeSet<String>) -> BTreeSet<String> {
        self.snapshots
            .iter()
            .flat_map(|s| pick(s).iter().cloned())
            .collect()
    }
}

impl FromIterator<MarkerSet> for MarkerHistory {
    fn from_iter<I: IntoIterator<Item = MarkerSet>>(iter: I) -> Self {
        Self {
            snapshots: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str], interfaces: &[&str], classes: &[&str]) -> MarkerSet {
        MarkerSet {
            tags: tags.iter().map(|s| s.to_string()).collect(),
            interfaces: interfaces.iter().map(|s| s.to_string()).collect(),
            classes: classes.iter().map(|s| s.to_string()).collect(),
            aliases: BTreeMap::new(),
        }
    }

    #[test]
    fn test_history_folds_snapshots() {
        let history: MarkerHistory = vec![
            set(&["a.Tag"], &["a.I"], &[]),
            set(&["b.Tag"], &[], &["b.C"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(history.len(), 2);
        assert_eq!(history.tags().len(), 2);
        assert!(history.interfaces().contains("a.I"));
        assert!(history.classes().contains("b.C"));
    }

    #[test]
    fn test_prune_removes_prior_markers_and_bootstrap() {
        let history: MarkerHistory = vec![set(&["old.Tag"], &["old.I"], &["old.C"])]
            .into_iter()
            .collect();

        let mut current = set(
            &["old.Tag", "new.Tag", "boot.Indexed"],
            &["old.I", "new.I"],
            &["old.C", "new.C"],
        );
        current.prune(&history, "boot.Indexed");

        assert_eq!(current, set(&["new.Tag"], &["new.I"], &["new.C"]));
    }

    #[test]
    fn test_prune_aliases_keeps_only_new_names() {
        let mut prior = MarkerSet::new();
        prior.add_aliases("pkg.A", ["a"]);
        let history: MarkerHistory = vec![prior].into_iter().collect();

        let mut current = MarkerSet::new();
        current.add_aliases("pkg.A", ["a", "alpha"]);
        current.add_aliases("pkg.B", ["b"]);
        current.prune(&history, "boot.Indexed");

        assert_eq!(current.aliases["pkg.A"].len(), 1);
        assert!(current.aliases["pkg.A"].contains("alpha"));
        assert!(current.aliases.contains_key("pkg.B"));

        let mut repeated = MarkerSet::new();
        repeated.add_aliases("pkg.A", ["a"]);
        repeated.prune(&history, "boot.Indexed");
        assert!(repeated.is_empty());
    }

    #[test]
    fn test_marker_set_json_shape_is_tolerant() {
        let parsed: MarkerSet = serde_json::from_str(r#"{"tags":["x.T"]}"#).unwrap();
        assert!(parsed.tags.contains("x.T"));
        assert!(parsed.classes.is_empty());
    }
}
