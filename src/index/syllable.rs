//! Prefix-searchable map from cleaned token text to the ids sharing that text.

use crate::tokenizer::TokenId;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered text index. Prefix queries walk a key range, so results come back
/// in lexicographic key order.
#[derive(Debug, Clone, Default)]
pub struct SyllableIndex {
    entries: BTreeMap<String, Vec<TokenId>>,
}

impl SyllableIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` under `text`, appending if the text is already present.
    pub fn insert(&mut self, text: &str, id: TokenId) {
        match self.entries.get_mut(text) {
            Some(ids) => ids.push(id),
            None => {
                self.entries.insert(text.to_string(), vec![id]);
            }
        }
    }

    /// Ids stored under exactly `text`.
    pub fn get(&self, text: &str) -> Option<&[TokenId]> {
        self.entries.get(text).map(Vec::as_slice)
    }

    /// Every `(key, ids)` whose key starts with `prefix`. An empty prefix yields all keys.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [TokenId])> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, ids)| (key.as_str(), ids.as_slice()))
    }

    /// Number of distinct texts.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of ids across all texts.
    pub fn id_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
