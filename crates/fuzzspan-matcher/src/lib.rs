//! Labeled fuzzy pattern matching
//!
//! Wraps a [`FuzzySearcher`](fuzzspan_core::FuzzySearcher) with a label
//! registry, per-pattern option overrides, match callbacks and batch
//! iteration over many documents.
//!
//! # Features
//!
//! - `parallel` - Match document batches in parallel via rayon

pub mod error;
pub mod matcher;
pub mod options;

pub use error::{MatcherError, MatcherResult};
pub use matcher::{FuzzyMatcher, LabeledMatch, OnMatch, PatternRecord};
pub use options::{PatternOptions, TrimResolution};
