//! Tokenizer integration: encode/decode and vocabulary enumeration.

mod word_level;

pub use word_level::{DEMO_SPECIAL_TOKENS, DEMO_VOCABULARY};

use crate::errors::AutocompleteError;
use std::path::Path;

/// Vocabulary token id.
pub type TokenId = u32;

/// Reserved character prefixed to subwords that start a new word (U+2581).
pub const WORD_BOUNDARY_MARKER: char = '▁';

/// Prefix of subwords that only continue a previous token.
pub const CONTINUATION_MARKER: &str = "##";

/// Special-token names tried, in order, when no BOS name is configured.
pub const BOS_CANDIDATES: [&str; 4] = ["[BOS]", "<s>", "<|endoftext|>", "</s>"];

/// One `(token_text, token_id)` pair of the tokenizer vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabEntry {
    pub text: String,
    pub id: TokenId,
}

impl VocabEntry {
    pub fn new(text: impl Into<String>, id: TokenId) -> Self {
        Self {
            text: text.into(),
            id,
        }
    }
}

/// The subword tokenizer the language model was trained with.
pub trait SubwordTokenizer: Send + Sync {
    /// Encode text to token ids, applying the tokenizer's own special-token rules.
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, AutocompleteError>;

    /// Decode token ids to text. Word-boundary markers render as spaces.
    fn decode(&self, ids: &[TokenId], skip_special: bool) -> Result<String, AutocompleteError>;

    /// Size of the id space (one past the largest id).
    fn vocab_size(&self) -> usize;

    fn bos_token_id(&self) -> Option<TokenId>;

    /// Every vocabulary entry, ordered by id.
    fn vocabulary(&self) -> Vec<VocabEntry>;
}

/// Wrapper around a `tokenizers::Tokenizer`, loaded from `tokenizer.json` or built
/// in memory by [`HfTokenizer::word_level`].
pub struct HfTokenizer {
    tokenizer: tokenizers::Tokenizer,
    bos_token_id: Option<TokenId>,
    vocab_size: usize,
}

impl HfTokenizer {
    /// Load tokenizer from a JSON file (e.g. tokenizer.json).
    ///
    /// `bos_token` names the begin-of-sequence token; when `None`, the names in
    /// [`BOS_CANDIDATES`] are tried.
    pub fn from_file(
        path: impl AsRef<Path>,
        bos_token: Option<&str>,
    ) -> Result<Self, AutocompleteError> {
        let tokenizer = tokenizers::Tokenizer::from_file(path.as_ref())
            .map_err(|e| AutocompleteError::Tokenizer(e.to_string()))?;
        Ok(Self::from_tokenizer(tokenizer, bos_token))
    }

    pub fn from_tokenizer(tokenizer: tokenizers::Tokenizer, bos_token: Option<&str>) -> Self {
        let bos_token_id = match bos_token {
            Some(name) => tokenizer.token_to_id(name),
            None => BOS_CANDIDATES
                .iter()
                .find_map(|name| tokenizer.token_to_id(name)),
        };
        let vocab_size = tokenizer
            .get_vocab(true)
            .values()
            .max()
            .map_or(0, |&max| max as usize + 1);
        Self {
            tokenizer,
            bos_token_id,
            vocab_size,
        }
    }

    pub fn token_to_id(&self, token: &str) -> Option<TokenId> {
        self.tokenizer.token_to_id(token)
    }
}

impl SubwordTokenizer for HfTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, AutocompleteError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| AutocompleteError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[TokenId], skip_special: bool) -> Result<String, AutocompleteError> {
        self.tokenizer
            .decode(ids, skip_special)
            .map_err(|e| AutocompleteError::Tokenizer(e.to_string()))
    }

    fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    fn bos_token_id(&self) -> Option<TokenId> {
        self.bos_token_id
    }

    fn vocabulary(&self) -> Vec<VocabEntry> {
        let mut entries: Vec<VocabEntry> = self
            .tokenizer
            .get_vocab(true)
            .into_iter()
            .map(|(text, id)| VocabEntry { text, id })
            .collect();
        entries.sort_by_key(|e| e.id);
        entries
    }
}
