//! The language-model boundary: token ids in, next-token scores out.

use crate::errors::InferenceError;
use crate::tokenizer::TokenId;
use std::sync::Arc;

/// A causal LM seen as a black box.
///
/// Implementations must be deterministic for a fixed configuration and must
/// report failures as errors, never as a zero vector.
pub trait NextTokenScorer: Send + Sync {
    /// Raw scores (logits) for the position after `input_ids`, one per vocabulary id.
    fn score(&self, input_ids: &[TokenId]) -> Result<Vec<f32>, InferenceError>;

    /// Length of every vector returned by [`score`](Self::score).
    fn vocab_size(&self) -> usize;
}

impl<T: NextTokenScorer + ?Sized> NextTokenScorer for Arc<T> {
    fn score(&self, input_ids: &[TokenId]) -> Result<Vec<f32>, InferenceError> {
        (**self).score(input_ids)
    }

    fn vocab_size(&self) -> usize {
        (**self).vocab_size()
    }
}

/// Score `input_ids` and check the vector covers the whole vocabulary.
pub(crate) fn score_checked(
    scorer: &dyn NextTokenScorer,
    input_ids: &[TokenId],
) -> Result<Vec<f32>, InferenceError> {
    let scores = scorer.score(input_ids)?;
    let expected = scorer.vocab_size();
    if scores.len() != expected {
        return Err(InferenceError::ScoreShape {
            expected,
            actual: scores.len(),
        });
    }
    Ok(scores)
}
