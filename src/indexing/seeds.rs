//! Static seed configuration.
//!
//! Line-oriented format with section headers:
//!
//! ```text
//! #annotations
//! com.example.Tag
//! #interfaces
//! com.example.Plugin
//! #classes
//! com.example.Base
//! #aliases
//! com.example.Foo:foo;bar
//! ```
//!
//! Blank lines are ignored. Entries outside a known section and malformed
//! alias entries are skipped with a warning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedParseError {
    #[error("Seed entry {entry:?} contains a line break")]
    LineBreak { entry: String },

    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Annotations,
    Interfaces,
    Classes,
    Aliases,
    Unknown,
}

impl Section {
    fn from_header(header: &str) -> Self {
        match header {
            "#annotations" => Section::Annotations,
            "#interfaces" => Section::Interfaces,
            "#classes" => Section::Classes,
            "#aliases" => Section::Aliases,
            _ => Section::Unknown,
        }
    }
}

/// Seeds configured by the user, in addition to the bootstrap tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedConfig {
    pub annotations: BTreeSet<String>,
    pub interfaces: BTreeSet<String>,
    pub classes: BTreeSet<String>,
    pub aliases: BTreeMap<String, BTreeSet<String>>,
}

impl SeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, SeedParseError> {
        let mut config = SeedConfig::new();
        let mut section: Option<Section> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                let parsed = Section::from_header(line);
                if parsed == Section::Unknown {
                    tracing::warn!("[seeds] unknown section '{line}' on line {}", index + 1);
                }
                section = Some(parsed);
                continue;
            }

            match section {
                Some(Section::Annotations) => {
                    config.annotations.insert(line.to_string());
                }
                Some(Section::Interfaces) => {
                    config.interfaces.insert(line.to_string());
                }
                Some(Section::Classes) => {
                    config.classes.insert(line.to_string());
                }
                Some(Section::Aliases) => match parse_alias(line) {
                    Some((id, aliases)) => config.aliases.entry(id).or_default().extend(aliases),
                    None => tracing::warn!(
                        "[seeds] skipping malformed alias on line {} (expected id:alias1;alias2): {line}",
                        index + 1
                    ),
                },
                Some(Section::Unknown) => {}
                None => {
                    tracing::warn!("[seeds] entry outside any section on line {}: {line}", index + 1);
                }
            }
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SeedParseError> {
        let text = std::fs::read_to_string(path).map_err(|source| SeedParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Union another configuration into this one.
    pub fn merge(&mut self, other: SeedConfig) {
        self.annotations.extend(other.annotations);
        self.interfaces.extend(other.interfaces);
        self.classes.extend(other.classes);
        for (id, aliases) in other.aliases {
            self.aliases.entry(id).or_default().extend(aliases);
        }
    }

    /// Reject entries that cannot be written to a line-delimited index.
    pub fn validate(&self) -> Result<(), SeedParseError> {
        let entries = self
            .annotations
            .iter()
            .chain(&self.interfaces)
            .chain(&self.classes)
            .chain(self.aliases.iter().flat_map(|(id, aliases)| std::iter::once(id).chain(aliases)));
        for entry in entries {
            if entry.contains(['\n', '\r']) {
                return Err(SeedParseError::LineBreak {
                    entry: entry.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
            && self.interfaces.is_empty()
            && self.classes.is_empty()
            && self.aliases.is_empty()
    }
}

fn parse_alias(line: &str) -> Option<(String, BTreeSet<String>)> {
    let (id, rest) = line.split_once(':')?;
    let id = id.trim();
    let aliases: BTreeSet<String> = rest
        .split(';')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect();
    if id.is_empty() || aliases.is_empty() {
        return None;
    }
    Some((id.to_string(), aliases))
}
