//! End-to-end suggestion pipeline: segment, resolve, score, select, assemble.
//!
//! Example: `Autocompleter::new(tokenizer, scorer)?.suggest("강남역 맛", 5, OutputMode::Full)`

use super::assemble::{assemble, OutputMode, Recommendation};
use super::cache::{CacheKey, RecommendationCache, DEFAULT_CACHE_CAPACITY};
use super::demo::{DemoScorer, DEMO_HIDDEN_SIZE};
use super::resolve::resolve;
use super::scorer::{score_checked, NextTokenScorer};
use super::select::select;
use crate::config::ServiceConfig;
use crate::errors::AutocompleteError;
use crate::index::VocabularyIndex;
use crate::query::segment;
use crate::tokenizer::{HfTokenizer, SubwordTokenizer, TokenId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared, read-only suggestion engine. Cheap to clone into request handlers
/// behind an `Arc`.
pub struct Autocompleter {
    tokenizer: Arc<dyn SubwordTokenizer>,
    scorer: Arc<dyn NextTokenScorer>,
    index: Arc<VocabularyIndex>,
    cache: RecommendationCache,
    bos_token_id: TokenId,
}

impl Autocompleter {
    /// Build the vocabulary index and wire tokenizer and scorer together.
    ///
    /// Fails when the tokenizer has no BOS token or when the scorer's vocabulary
    /// size differs from the tokenizer's.
    pub fn new(
        tokenizer: Arc<dyn SubwordTokenizer>,
        scorer: Arc<dyn NextTokenScorer>,
    ) -> Result<Self, AutocompleteError> {
        let bos_token_id = tokenizer.bos_token_id().ok_or_else(|| {
            AutocompleteError::Config("tokenizer has no begin-of-sequence token".into())
        })?;
        if tokenizer.vocab_size() != scorer.vocab_size() {
            return Err(AutocompleteError::Config(format!(
                "scorer vocabulary ({}) does not match tokenizer vocabulary ({})",
                scorer.vocab_size(),
                tokenizer.vocab_size()
            )));
        }
        let index = VocabularyIndex::from_tokenizer(tokenizer.as_ref())?;
        Ok(Self {
            tokenizer,
            scorer,
            index: Arc::new(index),
            cache: RecommendationCache::new(DEFAULT_CACHE_CAPACITY),
            bos_token_id,
        })
    }

    /// Engine for a service config: the configured tokenizer (or the demo
    /// vocabulary) scored by a seeded [`DemoScorer`].
    pub fn from_config(config: &ServiceConfig) -> Result<Self, AutocompleteError> {
        config.validate()?;
        let tokenizer: Arc<dyn SubwordTokenizer> = match &config.tokenizer_path {
            Some(path) => {
                info!("Loading tokenizer from {:?}...", path);
                Arc::new(HfTokenizer::from_file(path, config.bos_token.as_deref())?)
            }
            None => {
                info!("No tokenizer configured, using the demo vocabulary");
                Arc::new(HfTokenizer::demo()?)
            }
        };
        let scorer = Arc::new(DemoScorer::seeded(
            tokenizer.vocab_size(),
            DEMO_HIDDEN_SIZE,
            config.demo_seed,
        ));
        Ok(Self::new(tokenizer, scorer)?.with_cache_capacity(config.cache_capacity))
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = RecommendationCache::new(capacity);
        self
    }

    /// Up to `num_results` suggestions for `query`, served from the cache when
    /// the same `(query, num_results, mode)` was answered before.
    pub fn suggest(
        &self,
        query: &str,
        num_results: usize,
        mode: OutputMode,
    ) -> Result<Arc<[Recommendation]>, AutocompleteError> {
        let key = CacheKey::new(query, num_results, mode);
        self.cache
            .get_or_compute(key, || self.suggest_uncached(query, num_results, mode))
    }

    /// The pipeline without the cache.
    ///
    /// The model is not called when no vocabulary token can complete the
    /// fragment.
    pub fn suggest_uncached(
        &self,
        query: &str,
        num_results: usize,
        mode: OutputMode,
    ) -> Result<Vec<Recommendation>, AutocompleteError> {
        let segmented = segment(query);
        let context_ids = self.context_ids(segmented.context)?;
        let exclude: HashSet<TokenId> = context_ids.iter().copied().collect();

        let whitelist = resolve(segmented.fragment, &self.index, &exclude);
        if whitelist.is_empty() || num_results == 0 {
            return Ok(Vec::new());
        }

        let scores = score_checked(self.scorer.as_ref(), &context_ids).map_err(|e| {
            warn!(query, error = %e, "inference failed");
            e
        })?;
        let selected = select(&scores, &whitelist, &exclude, num_results);
        assemble(self.tokenizer.as_ref(), &context_ids, &selected, mode)
    }

    /// Model input for `context`: `[bos]` when empty, its encoding otherwise.
    fn context_ids(&self, context: &str) -> Result<Vec<TokenId>, AutocompleteError> {
        if context.is_empty() {
            return Ok(vec![self.bos_token_id]);
        }
        let ids = self.tokenizer.encode(context)?;
        if ids.is_empty() {
            return Ok(vec![self.bos_token_id]);
        }
        Ok(ids)
    }

    pub fn index(&self) -> &Arc<VocabularyIndex> {
        &self.index
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }

    pub fn tokenizer(&self) -> &Arc<dyn SubwordTokenizer> {
        &self.tokenizer
    }
}
