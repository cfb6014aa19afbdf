//! Limits applied while building prefix trees

use crate::pattern::{DEFAULT_CACHE_CAPACITY, SpanLimits};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for pattern extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of corpus tokens an occurrence may span, gaps included
    pub max_phrase_span: usize,
    /// Maximum number of pattern tokens (terminals plus gaps)
    pub max_phrase_length: usize,
    /// Maximum number of gaps in a pattern
    pub max_nonterminals: usize,
    /// Minimum number of tokens a gap stands for
    pub min_nonterminal_span: usize,
    /// Allow patterns to start with a gap at the start of the sentence
    pub sentence_initial_x: bool,
    /// Allow gaps to reach the end of the sentence
    pub sentence_final_x: bool,
    /// Number of occurrence sets kept in the pattern cache
    pub pattern_cache_capacity: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_phrase_span: 10,
            max_phrase_length: 10,
            max_nonterminals: 2,
            min_nonterminal_span: 2,
            sentence_initial_x: false,
            sentence_final_x: false,
            pattern_cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ExtractionConfig {
    /// Read a JSON configuration; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// The limits occurrence sets of gapped patterns depend on
    pub fn span_limits(&self) -> SpanLimits {
        SpanLimits {
            max_phrase_span: self.max_phrase_span,
            min_nonterminal_span: self.min_nonterminal_span,
        }
    }

    /// Limits of the worked example in Lopez (2008)
    pub fn lopez_example() -> Self {
        Self {
            max_phrase_span: 5,
            max_phrase_length: 5,
            max_nonterminals: 2,
            min_nonterminal_span: 2,
            ..Self::default()
        }
    }
}
