//! Central error types for hangul-autocomplete.

use thiserror::Error;

/// Failure reported by a [`NextTokenScorer`](crate::inference::NextTokenScorer).
///
/// Kept separate from [`AutocompleteError`] so adapters do not depend on the
/// rest of the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model not loaded: {0}")]
    ModelUnavailable(String),

    #[error("empty input sequence")]
    EmptyInput,

    #[error("token {token} out of vocabulary range (vocab size {vocab_size})")]
    TokenOutOfRange { token: u32, vocab_size: usize },

    #[error("score vector has {actual} entries, vocabulary has {expected}")]
    ScoreShape { expected: usize, actual: usize },

    #[error("device error: {0}")]
    Device(String),
}

#[derive(Error, Debug)]
pub enum AutocompleteError {
    #[error("vocabulary index build failed: {0}")]
    IndexBuild(String),

    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
