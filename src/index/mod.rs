//! Load-time vocabulary indexes: choseong buckets and the syllable prefix index.
//!
//! Built once from the tokenizer vocabulary, then shared read-only (behind
//! `Arc`) by every request.

mod choseong;
mod syllable;

pub use choseong::ChoseongIndex;
pub use syllable::SyllableIndex;

use crate::errors::AutocompleteError;
use crate::hangul;
use crate::tokenizer::{SubwordTokenizer, VocabEntry, CONTINUATION_MARKER, WORD_BOUNDARY_MARKER};
use std::time::Instant;
use tracing::info;

/// Both vocabulary indexes.
#[derive(Debug, Clone)]
pub struct VocabularyIndex {
    pub choseong: ChoseongIndex,
    pub syllable: SyllableIndex,
    skipped: usize,
}

/// Summary of a built index, printed by `inspect`.
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub vocab_entries: usize,
    pub skipped_entries: usize,
    pub syllable_keys: usize,
    pub syllable_ids: usize,
    pub choseong_ids: usize,
    pub buckets: Vec<(char, usize)>,
}

/// Token text with the leading word-boundary marker removed.
///
/// `None` for continuation subwords and for texts that are empty once cleaned.
pub fn clean_token(text: &str) -> Option<&str> {
    if text.starts_with(CONTINUATION_MARKER) {
        return None;
    }
    let clean = text.strip_prefix(WORD_BOUNDARY_MARKER).unwrap_or(text);
    (!clean.is_empty()).then_some(clean)
}

impl VocabularyIndex {
    /// Index `entries` in iteration order.
    ///
    /// Fails when the vocabulary is empty or has no indexable token.
    pub fn build(
        entries: impl IntoIterator<Item = VocabEntry>,
    ) -> Result<Self, AutocompleteError> {
        let start = Instant::now();
        let mut choseong = ChoseongIndex::new();
        let mut syllable = SyllableIndex::new();
        let mut total = 0usize;
        let mut skipped = 0usize;

        for entry in entries {
            total += 1;
            let Some(clean) = clean_token(&entry.text) else {
                skipped += 1;
                continue;
            };
            if let Some(c) = clean.chars().next().and_then(hangul::classify) {
                choseong.push(c, entry.id);
            }
            syllable.insert(clean, entry.id);
        }

        if total == 0 {
            return Err(AutocompleteError::IndexBuild("vocabulary is empty".into()));
        }
        if syllable.is_empty() {
            return Err(AutocompleteError::IndexBuild(format!(
                "none of {} vocabulary entries is indexable",
                total
            )));
        }

        let index = Self {
            choseong,
            syllable,
            skipped,
        };
        info!(
            "Vocabulary indexed: {} entries ({} skipped), {} syllable keys, {} choseong ids in {:?}",
            total,
            skipped,
            index.syllable.key_count(),
            index.choseong.len(),
            start.elapsed()
        );
        Ok(index)
    }

    /// Index the full vocabulary of `tokenizer`.
    pub fn from_tokenizer(tokenizer: &dyn SubwordTokenizer) -> Result<Self, AutocompleteError> {
        Self::build(tokenizer.vocabulary())
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            vocab_entries: self.syllable.id_count() + self.skipped,
            skipped_entries: self.skipped,
            syllable_keys: self.syllable.key_count(),
            syllable_ids: self.syllable.id_count(),
            choseong_ids: self.choseong.len(),
            buckets: self
                .choseong
                .bucket_sizes()
                .into_iter()
                .map(|(c, n)| (c.symbol(), n))
                .collect(),
        }
    }
}
