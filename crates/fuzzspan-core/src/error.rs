//! Search error types

use thiserror::Error;

/// Errors that can occur while configuring or running a search
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SearchError {
    /// Document or query is not a well-formed sequence, or the query is empty
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Unsupported registry or searcher configuration
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Similarity function name not available in the active mode
    #[error(
        "no fuzzy {mode} matching function called '{name}'; \
         matching function must be one of (case insensitive): {}",
        .available.join(", ")
    )]
    UnknownSimilarityFunction {
        mode: String,
        name: String,
        available: Vec<String>,
    },

    /// Trim rule name not present in the trim registry
    #[error("unknown trim rule '{name}'; available rules: [{}]", .available.join(", "))]
    UnknownTrimRule { name: String, available: Vec<String> },

    /// Flex is neither "default" nor a non-negative integer
    #[error("invalid flex value '{0}': expected \"default\" or a non-negative integer")]
    InvalidFlex(String),
}

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_function_lists_available_names() {
        let err = SearchError::UnknownSimilarityFunction {
            mode: "token".to_string(),
            name: "weighted".to_string(),
            available: vec!["simple".to_string(), "quick".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'weighted'"));
        assert!(msg.contains("simple, quick"));
        assert!(msg.contains("token"));
    }

    #[test]
    fn unknown_trim_rule_lists_available_names() {
        let err = SearchError::UnknownTrimRule {
            name: "noun".to_string(),
            available: vec![],
        };
        assert_eq!(err.to_string(), "unknown trim rule 'noun'; available rules: []");
    }
}
