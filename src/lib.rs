//! # hangul-autocomplete
//!
//! Korean search-keyword autocompletion by constrained next-token prediction.
//!
//! ## Architecture
//!
//! - **Hangul**: initial-consonant (choseong) classification of syllables
//! - **Index**: choseong buckets and a sorted syllable prefix index over the vocabulary
//! - **Inference**: whitelist resolution, masked top-n selection over model scores,
//!   result decoding and an LRU recommendation cache
//! - **Server**: `GET /api/v1/search` over axum, with Prometheus metrics

pub mod config;
pub mod errors;
pub mod hangul;
pub mod index;
pub mod inference;
pub mod monitoring;
pub mod query;
pub mod server;
pub mod tokenizer;

pub use config::ServiceConfig;
pub use errors::{AutocompleteError, InferenceError};
pub use hangul::Choseong;
pub use index::{IndexStats, VocabularyIndex};
pub use inference::{
    Autocompleter, CandidateSet, DemoScorer, NextTokenScorer, OutputMode, Recommendation,
    RecommendationCache,
};
pub use monitoring::Telemetry;
pub use query::{segment, SegmentedQuery};
pub use tokenizer::{HfTokenizer, SubwordTokenizer, TokenId, VocabEntry};
