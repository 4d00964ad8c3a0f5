//! Entity mention maps with source-line provenance.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// Mapping from a normalized entity key (species or method) to the source
/// line numbers at which it was mentioned.
///
/// Appends de-duplicate only against the *last* element for a key: the same
/// line is not re-added by consecutive mentions (several sentences of one
/// record), but the list is not a set. Aggregation across records uses
/// [`MentionMap::merge`], which extends lists verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MentionMap {
    entries: BTreeMap<String, Vec<u64>>,
}

impl MentionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mention of `key` at `line_no`, skipping the append when the
    /// key's most recent line number is already `line_no`.
    pub fn note(&mut self, key: impl Into<String>, line_no: u64) {
        let lines = self.entries.entry(key.into()).or_default();
        if lines.last() != Some(&line_no) {
            lines.push(line_no);
        }
    }

    /// Extend this map with every entry of `other`, appending line-number
    /// lists without any de-duplication.
    pub fn merge(&mut self, other: &MentionMap) {
        for (key, lines) in &other.entries {
            self.entries
                .entry(key.clone())
                .or_default()
                .extend_from_slice(lines);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn lines(&self, key: &str) -> Option<&[u64]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<u64>> {
        self.entries.iter()
    }

    /// Keys joined with `:`, the audit-row rendering of a map.
    pub fn joined_keys(&self) -> String {
        self.keys().collect::<Vec<_>>().join(":")
    }

    /// Total number of recorded mentions across all keys.
    pub fn total_mentions(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

impl<'a> IntoIterator for &'a MentionMap {
    type Item = (&'a String, &'a Vec<u64>);
    type IntoIter = btree_map::Iter<'a, String, Vec<u64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
