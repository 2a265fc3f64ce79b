//! In-memory word-level tokenizers built with the `tokenizers` crate.
//!
//! Words are split on whitespace by a `Metaspace` pre-tokenizer, so every
//! word starts with [`WORD_BOUNDARY_MARKER`] and a trailing space becomes a
//! lone marker token. The matching decoder renders markers as spaces.

use super::{HfTokenizer, VocabEntry, WORD_BOUNDARY_MARKER};
use crate::errors::AutocompleteError;
use std::collections::HashMap;
use tokenizers::models::wordlevel::WordLevel;
use tokenizers::pre_tokenizers::metaspace::{Metaspace, PrependScheme};
use tokenizers::{AddedToken, Tokenizer};

const UNK_CANDIDATES: [&str; 2] = ["[UNK]", "<unk>"];

/// Special tokens of the demo vocabulary.
pub const DEMO_SPECIAL_TOKENS: [&str; 4] = ["[BOS]", "[EOS]", "[UNK]", "[PAD]"];

/// Built-in vocabulary for the demo model: search-keyword subwords, ids in order.
pub const DEMO_VOCABULARY: &[&str] = &[
    "[BOS]", "[EOS]", "[UNK]", "[PAD]", "▁", "▁강남", "▁강남역", "역", "##역", "▁맛", "맛",
    "▁맛집", "▁맛있는", "▁맛집추천", "집", "있는", "▁카페", "▁카페거리", "▁아이폰", "▁아이패드",
    "▁17", "17", "▁케이스", "▁가격", "▁날씨", "▁내일", "▁서울", "▁서울역", "▁부산", "▁여행",
    "▁여행지", "▁코스", "▁추천", "▁데이트", "▁데이트코스", "▁맥북", "▁메뉴", "▁모임", "▁미용실",
    "▁병원", "▁주차", "▁주차장", "▁술집", "▁숙소", "▁근처", "▁후기", "▁가볼만한곳", "##스",
];

/// Word-level `tokenizers::Tokenizer` over explicit entries.
///
/// Texts in `special_tokens` are registered as special added tokens, so
/// `decode(.., skip_special = true)` drops them. The first of `[UNK]`/`<unk>`
/// present becomes the unknown token; without one, out-of-vocabulary words
/// fail to encode.
fn build_word_level(
    entries: impl IntoIterator<Item = VocabEntry>,
    special_tokens: &[&str],
) -> Result<Tokenizer, AutocompleteError> {
    let vocab: HashMap<String, u32> = entries.into_iter().map(|e| (e.text, e.id)).collect();
    let mut builder = WordLevel::builder();
    if let Some(unk) = UNK_CANDIDATES.iter().find(|t| vocab.contains_key(**t)) {
        builder = builder.unk_token(unk.to_string());
    }
    let model = builder
        .vocab(vocab)
        .build()
        .map_err(|e| AutocompleteError::Tokenizer(e.to_string()))?;

    let metaspace = Metaspace::new(WORD_BOUNDARY_MARKER, PrependScheme::Always, true);
    let mut tokenizer = Tokenizer::new(model);
    tokenizer.with_pre_tokenizer(metaspace.clone());
    tokenizer.with_decoder(metaspace);
    let specials: Vec<AddedToken> = special_tokens
        .iter()
        .map(|t| AddedToken::from(*t, true))
        .collect();
    tokenizer.add_special_tokens(&specials);
    Ok(tokenizer)
}

impl HfTokenizer {
    /// Word-level tokenizer over `entries`; see [`build_word_level`].
    pub fn word_level(
        entries: impl IntoIterator<Item = VocabEntry>,
        special_tokens: &[&str],
    ) -> Result<Self, AutocompleteError> {
        Ok(Self::from_tokenizer(
            build_word_level(entries, special_tokens)?,
            None,
        ))
    }

    /// Tokenizer over [`DEMO_VOCABULARY`], ids in slice order.
    pub fn demo() -> Result<Self, AutocompleteError> {
        Self::word_level(
            DEMO_VOCABULARY
                .iter()
                .enumerate()
                .map(|(id, text)| VocabEntry::new(*text, id as u32)),
            &DEMO_SPECIAL_TOKENS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{SubwordTokenizer, TokenId};

    fn texts(tok: &HfTokenizer, ids: &[TokenId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tok.tokenizer.id_to_token(id).unwrap())
            .collect()
    }

    #[test]
    fn test_encode_words() {
        let tok = HfTokenizer::demo().unwrap();
        let ids = tok.encode("강남역 맛집").unwrap();
        assert_eq!(texts(&tok, &ids), vec!["▁강남역", "▁맛집"]);
    }

    #[test]
    fn test_encode_trailing_space_keeps_marker() {
        let tok = HfTokenizer::demo().unwrap();
        let ids = tok.encode("강남역 ").unwrap();
        assert_eq!(texts(&tok, &ids), vec!["▁강남역", "▁"]);
    }

    #[test]
    fn test_encode_decode() {
        let tok = HfTokenizer::demo().unwrap();
        let text = "서울 여행 코스";
        let ids = tok.encode(text).unwrap();
        assert_eq!(tok.decode(&ids, true).unwrap(), text);
    }

    #[test]
    fn test_unknown_word_maps_to_unk() {
        let tok = HfTokenizer::demo().unwrap();
        let ids = tok.encode("뷁").unwrap();
        assert_eq!(ids, vec![tok.token_to_id("[UNK]").unwrap()]);
    }

    #[test]
    fn test_unknown_word_without_unk_fails() {
        let tok = HfTokenizer::word_level(
            [VocabEntry::new("[BOS]", 0), VocabEntry::new("▁맛", 1)],
            &["[BOS]"],
        )
        .unwrap();
        assert!(tok.encode("뷁").is_err());
    }

    #[test]
    fn test_decode_skips_special() {
        let tok = HfTokenizer::demo().unwrap();
        let bos = tok.bos_token_id().unwrap();
        let matjip = tok.token_to_id("▁맛집").unwrap();
        assert_eq!(tok.decode(&[bos, matjip], true).unwrap(), "맛집");
        assert!(tok.decode(&[bos, matjip], false).unwrap().starts_with("[BOS]"));
    }

    #[test]
    fn test_demo_vocabulary_in_id_order() {
        let tok = HfTokenizer::demo().unwrap();
        assert_eq!(tok.bos_token_id(), Some(0));
        assert_eq!(tok.vocab_size(), DEMO_VOCABULARY.len());
        let vocab = tok.vocabulary();
        let listed: Vec<&str> = vocab.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(listed, DEMO_VOCABULARY);
    }

    #[test]
    fn test_sparse_ids_vocab_size() {
        let tok = HfTokenizer::word_level(
            [VocabEntry::new("맛집", 101), VocabEntry::new("맛", 103)],
            &[],
        )
        .unwrap();
        assert_eq!(tok.vocab_size(), 104);
        let ids: Vec<TokenId> = tok.vocabulary().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![101, 103]);
        assert_eq!(tok.bos_token_id(), None);
    }
}
