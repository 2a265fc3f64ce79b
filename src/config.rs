//! Service configuration.
//!
//! Resolution order is CLI flag > `HANGUL_AC_*` environment variable > JSON
//! file > built-in default. The binary handles the first two through clap;
//! this module owns the file layer, the defaults and validation.

use crate::errors::AutocompleteError;
use crate::inference::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the HTTP service and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// HuggingFace `tokenizer.json`. `None` selects the built-in demo vocabulary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenizer_path: Option<PathBuf>,
    /// Name of the begin-of-sequence token. `None` tries the usual names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bos_token: Option<String>,
    pub cache_capacity: usize,
    /// Results returned when a request does not ask for a count.
    pub default_results: usize,
    /// Upper bound on results per request.
    pub max_results: usize,
    /// Longest accepted query, in characters.
    pub max_query_chars: usize,
    /// Seed of the demo scorer.
    pub demo_seed: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            tokenizer_path: None,
            bos_token: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            default_results: 3,
            max_results: 20,
            max_query_chars: 25,
            demo_seed: 42,
        }
    }
}

impl ServiceConfig {
    /// Parse a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AutocompleteError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AutocompleteError::Config(format!("{}: {}", path.display(), e)))
    }

    /// `from_file` when a path is given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, AutocompleteError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AutocompleteError> {
        if self.cache_capacity == 0 {
            return Err(AutocompleteError::Config(
                "cache_capacity must be at least 1".into(),
            ));
        }
        if self.max_results == 0 {
            return Err(AutocompleteError::Config(
                "max_results must be at least 1".into(),
            ));
        }
        if self.default_results == 0 || self.default_results > self.max_results {
            return Err(AutocompleteError::Config(format!(
                "default_results must be in 1..={} (got {})",
                self.max_results, self.default_results
            )));
        }
        if self.max_query_chars == 0 {
            return Err(AutocompleteError::Config(
                "max_query_chars must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
