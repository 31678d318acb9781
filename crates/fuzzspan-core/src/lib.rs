//! fuzzspan core engine
//!
//! Finds approximate occurrences of a token-sequence query inside a
//! tokenized document and reports them as scored token spans.
//!
//! # Features
//!
//! - `parallel` - Parallel candidate optimization via rayon for long documents
//!
//! # Example
//!
//! ```rust
//! use fuzzspan_core::{Doc, FuzzySearcher, SearchOptions};
//!
//! let doc = Doc::from_words(
//!     &["chiken", "from", "Popeyes", "is", "better", "than", "chken"],
//!     &[true, true, true, true, true, true, false],
//! )
//! .unwrap();
//! let query = Doc::from_words(&["chicken"], &[false]).unwrap();
//!
//! let searcher = FuzzySearcher::new();
//! let matches = searcher
//!     .multi_match(&doc, &query, &SearchOptions::default())
//!     .unwrap();
//! assert_eq!(matches[0].as_tuple(), (0, 1, 92.0));
//! ```

pub mod config;
pub mod error;
pub mod fuzz;
pub mod search;
pub mod similarity;
pub mod token;
pub mod trim;

// Re-export main types at crate root
pub use config::{SearchOptions, SearcherConfig};
pub use error::{SearchError, SearchResult};
pub use search::{
    adjust_boundaries, filter_overlapping, index_of_max, indices_of_top_n, scan_doc,
    CandidateMap, Flex, FuzzySearcher, Match,
};
pub use similarity::{FuzzyFunc, MatchMode, SimilarityFn, SimilarityRegistry};
pub use token::{Doc, Token};
pub use trim::{TrimRegistry, TrimRule, TrimSet, TrimmedBounds};
