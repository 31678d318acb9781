//! Search options and searcher configuration

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::search::Flex;
use crate::similarity::{FuzzyFunc, MatchMode};
use crate::trim::{TrimRule, TrimSet};

/// Per-call search options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Similarity function used for scanning and optimization
    pub fuzzy_func: FuzzyFunc,
    /// Minimum score for a scanned window to become a candidate
    pub min_r1: f64,
    /// Minimum score for an optimized span to be returned
    pub min_r2: f64,
    pub ignore_case: bool,
    pub flex: Flex,
    #[serde(flatten)]
    pub trims: TrimSet,
    /// Maximum number of matches; 0 returns all
    pub n: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy_func: FuzzyFunc::Weighted,
            min_r1: 75.0,
            min_r2: 75.0,
            ignore_case: true,
            flex: Flex::Default,
            trims: TrimSet::default(),
            n: 0,
        }
    }
}

impl SearchOptions {
    /// Check thresholds are within 0..=100
    pub fn validate(&self) -> SearchResult<()> {
        for (name, value) in [("min_r1", self.min_r1), ("min_r2", self.min_r2)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(SearchError::InvalidConfiguration(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Searcher-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherConfig {
    pub mode: MatchMode,
    /// Trim rules the searcher accepts
    pub trim_rules: Vec<TrimRule>,
    /// Candidate count at which optimization runs in parallel
    pub parallel_threshold: usize,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::Phrase,
            trim_rules: TrimRule::ALL.to_vec(),
            parallel_threshold: 1000,
        }
    }
}
