//! String interning for the record line format.
//!
//! A [`Dictionary`] is an insertion-ordered key → value table where the
//! first mapping for a key wins. The write path uses a [`TokenAllocator`]
//! (value → token, allocating small integers on demand); its
//! [`reverse`](Dictionary::reverse) is the token → value table readers use.

use indexmap::IndexMap;
use std::collections::HashSet;

/// Separator between key and value in the canonical form.
pub const PAIR_SEPARATOR: char = ':';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: IndexMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value mapped to `key`.
    pub fn map(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Add a mapping unless `key` is already mapped.
    ///
    /// Returns `true` if the mapping was inserted.
    pub fn add_mapping(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value.into());
        true
    }

    /// Swap key and value roles. When several keys share a value the first one wins.
    pub fn reverse(&self) -> Dictionary {
        let mut reversed = Dictionary::new();
        for (key, value) in &self.entries {
            reversed.add_mapping(value.clone(), key.clone());
        }
        reversed
    }

    /// All pairs as `key:value`, joined by `separator`, in insertion order.
    pub fn to_canonical_form(&self, separator: &str) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}{PAIR_SEPARATOR}{value}"))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Parse one `key:value` pair. The key ends at the first separator.
    pub fn parse_pair(line: &str) -> Option<(&str, &str)> {
        line.split_once(PAIR_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_map(&self) -> IndexMap<String, String> {
        self.entries.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dictionary = Dictionary::new();
        for (key, value) in iter {
            dictionary.add_mapping(key, value);
        }
        dictionary
    }
}

/// Write-side dictionary that hands out the next free integer token for
/// strings it has not seen yet.
#[derive(Debug, Clone, Default)]
pub struct TokenAllocator {
    tokens: Dictionary,
    used: HashSet<String>,
    next: u64,
}

impl TokenAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for `value`, allocating one if needed.
    pub fn map(&mut self, value: &str) -> String {
        if let Some(token) = self.tokens.map(value) {
            return token.to_string();
        }
        let mut token = self.next.to_string();
        while self.used.contains(&token) {
            self.next += 1;
            token = self.next.to_string();
        }
        self.next += 1;
        self.used.insert(token.clone());
        self.tokens.add_mapping(value, token.clone());
        token
    }

    /// Pre-seed a mapping. First write wins, and a token already in use is refused.
    pub fn add_mapping(&mut self, value: impl Into<String>, token: impl Into<String>) -> bool {
        let value = value.into();
        let token = token.into();
        if self.used.contains(&token) || self.tokens.map(&value).is_some() {
            return false;
        }
        self.used.insert(token.clone());
        self.tokens.add_mapping(value, token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The value → token table built so far.
    pub fn dictionary(&self) -> &Dictionary {
        &self.tokens
    }

    /// The token → value table readers decode with.
    pub fn reader_dictionary(&self) -> Dictionary {
        self.tokens.reverse()
    }
}
