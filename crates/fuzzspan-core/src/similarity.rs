//! Similarity function registry
//!
//! A closed set of named functions, resolved per match mode. Phrase mode
//! exposes every function; token mode only the ones that make sense for a
//! single token.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::fuzz;

/// A similarity callable: `(text, text) -> score in 0..=100`
pub type SimilarityFn = fn(&str, &str) -> f64;

/// Whether functions compare multi-token phrases or single tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Phrase,
    Token,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phrase => write!(f, "phrase"),
            Self::Token => write!(f, "token"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "phrase" => Ok(Self::Phrase),
            "token" => Ok(Self::Token),
            _ => Err(SearchError::InvalidConfiguration(format!(
                "match mode must be either 'phrase' or 'token', got '{}'",
                s
            ))),
        }
    }
}

/// Named similarity functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyFunc {
    Simple,
    Partial,
    TokenSet,
    TokenSort,
    Token,
    PartialTokenSet,
    PartialTokenSort,
    PartialToken,
    #[default]
    Weighted,
    Quick,
    JaroWinkler,
    Levenshtein,
}

impl FuzzyFunc {
    /// Every function, in registry order
    pub const ALL: [FuzzyFunc; 12] = [
        Self::Simple,
        Self::Partial,
        Self::TokenSet,
        Self::TokenSort,
        Self::Token,
        Self::PartialTokenSet,
        Self::PartialTokenSort,
        Self::PartialToken,
        Self::Weighted,
        Self::Quick,
        Self::JaroWinkler,
        Self::Levenshtein,
    ];

    /// Functions usable on single tokens
    pub const TOKEN_MODE: [FuzzyFunc; 2] = [Self::Simple, Self::Quick];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Partial => "partial",
            Self::TokenSet => "token_set",
            Self::TokenSort => "token_sort",
            Self::Token => "token",
            Self::PartialTokenSet => "partial_token_set",
            Self::PartialTokenSort => "partial_token_sort",
            Self::PartialToken => "partial_token",
            Self::Weighted => "weighted",
            Self::Quick => "quick",
            Self::JaroWinkler => "jaro_winkler",
            Self::Levenshtein => "levenshtein",
        }
    }

    pub fn scorer(&self) -> SimilarityFn {
        match self {
            Self::Simple => fuzz::ratio,
            Self::Partial => fuzz::partial_ratio,
            Self::TokenSet => fuzz::token_set_ratio,
            Self::TokenSort => fuzz::token_sort_ratio,
            Self::Token => fuzz::token_ratio,
            Self::PartialTokenSet => fuzz::partial_token_set_ratio,
            Self::PartialTokenSort => fuzz::partial_token_sort_ratio,
            Self::PartialToken => fuzz::partial_token_ratio,
            Self::Weighted => fuzz::wratio,
            Self::Quick => fuzz::qratio,
            Self::JaroWinkler => fuzz::jaro_winkler_ratio,
            Self::Levenshtein => fuzz::levenshtein_ratio,
        }
    }

    fn lookup(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for FuzzyFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FuzzyFunc {
    type Err = SearchError;

    /// Case-insensitive parse over every known function, regardless of mode
    fn from_str(s: &str) -> SearchResult<Self> {
        Self::lookup(s).ok_or_else(|| SearchError::UnknownSimilarityFunction {
            mode: MatchMode::Phrase.to_string(),
            name: s.to_string(),
            available: Self::ALL.iter().map(|f| f.name().to_string()).collect(),
        })
    }
}

/// Similarity functions available for one match mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityRegistry {
    mode: MatchMode,
    funcs: Vec<FuzzyFunc>,
}

impl Default for SimilarityRegistry {
    fn default() -> Self {
        Self::new(MatchMode::Phrase)
    }
}

impl SimilarityRegistry {
    pub fn new(mode: MatchMode) -> Self {
        let funcs = match mode {
            MatchMode::Phrase => FuzzyFunc::ALL.to_vec(),
            MatchMode::Token => FuzzyFunc::TOKEN_MODE.to_vec(),
        };
        Self { mode, funcs }
    }

    /// Construct from a mode name; anything but "phrase" or "token" is rejected
    pub fn from_mode_name(mode: &str) -> SearchResult<Self> {
        Ok(Self::new(mode.parse()?))
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Names of the available functions
    pub fn names(&self) -> Vec<&'static str> {
        self.funcs.iter().map(FuzzyFunc::name).collect()
    }

    pub fn contains(&self, func: FuzzyFunc) -> bool {
        self.funcs.contains(&func)
    }

    /// Look up a function by name (case-insensitive)
    pub fn get(&self, name: &str) -> SearchResult<SimilarityFn> {
        match FuzzyFunc::lookup(name) {
            Some(func) if self.contains(func) => Ok(func.scorer()),
            _ => Err(self.unknown(name)),
        }
    }

    /// Check a typed identifier against this registry's mode
    pub fn resolve(&self, func: FuzzyFunc) -> SearchResult<SimilarityFn> {
        if self.contains(func) {
            Ok(func.scorer())
        } else {
            Err(self.unknown(func.name()))
        }
    }

    fn unknown(&self, name: &str) -> SearchError {
        SearchError::UnknownSimilarityFunction {
            mode: self.mode.to_string(),
            name: name.to_string(),
            available: self.names().into_iter().map(String::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_mode_has_all_named_functions() {
        let registry = SimilarityRegistry::new(MatchMode::Phrase);
        for name in [
            "simple",
            "partial",
            "token_set",
            "token_sort",
            "token",
            "partial_token_set",
            "partial_token_sort",
            "partial_token",
            "weighted",
            "quick",
        ] {
            assert!(registry.get(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = SimilarityRegistry::default();
        let simple = registry.get("SIMPLE").unwrap();
        assert_eq!(simple("hi", "hi"), 100.0);
    }

    #[test]
    fn test_token_mode_is_restricted() {
        let registry = SimilarityRegistry::new(MatchMode::Token);
        assert_eq!(registry.names(), vec!["simple", "quick"]);
        assert!(registry.get("quick").is_ok());

        match registry.get("weighted") {
            Err(SearchError::UnknownSimilarityFunction { mode, name, available }) => {
                assert_eq!(mode, "token");
                assert_eq!(name, "weighted");
                assert_eq!(available, vec!["simple", "quick"]);
            }
            other => panic!("expected UnknownSimilarityFunction, got {:?}", other.map(|_| ())),
        }
        assert!(registry.resolve(FuzzyFunc::Token).is_err());
    }

    #[test]
    fn test_unknown_name() {
        let registry = SimilarityRegistry::default();
        assert!(matches!(
            registry.get("nonexistent"),
            Err(SearchError::UnknownSimilarityFunction { .. })
        ));
    }

    #[test]
    fn test_invalid_mode() {
        assert!(matches!(
            SimilarityRegistry::from_mode_name("sentence"),
            Err(SearchError::InvalidConfiguration(_))
        ));
        assert_eq!(
            SimilarityRegistry::from_mode_name("Token").unwrap().mode(),
            MatchMode::Token
        );
    }

    #[test]
    fn test_fuzzy_func_parse() {
        assert_eq!("Partial_Token".parse::<FuzzyFunc>().unwrap(), FuzzyFunc::PartialToken);
        assert!("wratio".parse::<FuzzyFunc>().is_err());
        assert_eq!(FuzzyFunc::default(), FuzzyFunc::Weighted);
    }
}
