//! Constrained next-token suggestion.

pub mod assemble;
pub mod cache;
pub mod constraints;
pub mod demo;
pub mod pipeline;
pub mod resolve;
pub mod scorer;
pub mod select;

pub use assemble::{assemble, OutputMode, Recommendation};
pub use cache::{CacheKey, RecommendationCache, DEFAULT_CACHE_CAPACITY};
pub use constraints::CandidateSet;
pub use demo::{DemoScorer, DEMO_HIDDEN_SIZE};
pub use pipeline::Autocompleter;
pub use resolve::resolve;
pub use scorer::NextTokenScorer;
pub use select::{select, softmax, ScoredToken};
