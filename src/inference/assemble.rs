//! Turn selected token ids into display strings.

use super::select::ScoredToken;
use crate::errors::AutocompleteError;
use crate::tokenizer::{SubwordTokenizer, TokenId, WORD_BOUNDARY_MARKER};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// What a recommendation's text contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Context plus the suggested token, decoded together.
    #[default]
    Full,
    /// The suggested token alone.
    #[serde(rename = "token")]
    TokenOnly,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Full => "full",
            OutputMode::TokenOnly => "token",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = AutocompleteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(OutputMode::Full),
            "token" => Ok(OutputMode::TokenOnly),
            other => Err(AutocompleteError::InvalidInput(format!(
                "unknown output mode '{}' (expected 'full' or 'token')",
                other
            ))),
        }
    }
}

/// One suggestion with the model's unconstrained probability for its token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub text: String,
    pub probability: f32,
}

/// Strip word-boundary marker remnants and surrounding whitespace.
fn clean_token_text(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == WORD_BOUNDARY_MARKER || c.is_whitespace())
        .trim_end()
}

/// Decode `selected` in rank order.
///
/// Texts that decode identically to a higher-ranked entry are dropped, as are
/// tokens that decode to nothing visible.
pub fn assemble(
    tokenizer: &dyn SubwordTokenizer,
    context_ids: &[TokenId],
    selected: &[ScoredToken],
    mode: OutputMode,
) -> Result<Vec<Recommendation>, AutocompleteError> {
    let mut seen = HashSet::with_capacity(selected.len());
    let mut out = Vec::with_capacity(selected.len());
    let mut sequence = Vec::with_capacity(context_ids.len() + 1);

    for token in selected {
        let text = match mode {
            OutputMode::TokenOnly => {
                let decoded = tokenizer.decode(&[token.token_id], true)?;
                clean_token_text(&decoded).to_string()
            }
            OutputMode::Full => {
                sequence.clear();
                sequence.extend_from_slice(context_ids);
                sequence.push(token.token_id);
                tokenizer.decode(&sequence, true)?
            }
        };
        if text.trim().is_empty() || !seen.insert(text.clone()) {
            continue;
        }
        out.push(Recommendation {
            text,
            probability: token.probability,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::HfTokenizer;

    fn scored(tok: &HfTokenizer, text: &str, probability: f32) -> ScoredToken {
        ScoredToken {
            token_id: tok.token_to_id(text).unwrap(),
            probability,
        }
    }

    #[test]
    fn test_token_only_strips_marker() {
        let tok = HfTokenizer::demo().unwrap();
        let selected = [scored(&tok, "▁맛집", 0.3), scored(&tok, "있는", 0.1)];
        let out = assemble(&tok, &[], &selected, OutputMode::TokenOnly).unwrap();
        let texts: Vec<&str> = out.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["맛집", "있는"]);
        assert_eq!(out[0].probability, 0.3);
    }

    #[test]
    fn test_full_decodes_context_plus_token() {
        let tok = HfTokenizer::demo().unwrap();
        let context = tok.encode("강남역").unwrap();
        let selected = [scored(&tok, "▁맛집", 0.2)];
        let out = assemble(&tok, &context, &selected, OutputMode::Full).unwrap();
        assert_eq!(out[0].text, "강남역 맛집");
    }

    #[test]
    fn test_full_with_bos_context() {
        let tok = HfTokenizer::demo().unwrap();
        let bos = tok.bos_token_id().unwrap();
        let selected = [scored(&tok, "▁맛집", 0.2)];
        let out = assemble(&tok, &[bos], &selected, OutputMode::Full).unwrap();
        assert_eq!(out[0].text, "맛집");
    }

    #[test]
    fn test_duplicate_texts_keep_first() {
        let tok = HfTokenizer::demo().unwrap();
        let selected = [scored(&tok, "▁맛", 0.4), scored(&tok, "맛", 0.2)];
        let out = assemble(&tok, &[], &selected, OutputMode::TokenOnly).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].probability, 0.4);
    }

    #[test]
    fn test_mode_parse_and_serde() {
        assert_eq!("full".parse::<OutputMode>().unwrap(), OutputMode::Full);
        assert_eq!("TOKEN".parse::<OutputMode>().unwrap(), OutputMode::TokenOnly);
        assert!("both".parse::<OutputMode>().is_err());
        assert_eq!(
            serde_json::to_string(&OutputMode::TokenOnly).unwrap(),
            "\"token\""
        );
        let mode: OutputMode = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(mode, OutputMode::Full);
    }
}
