//! Span trimming rules
//!
//! A trim rule is a token predicate answering "should this token be dropped
//! when it sits at a span edge". Rules are applied after alignment so a match
//! never starts or ends on filler such as stop words or punctuation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::token::{Doc, Token};

/// Predicate over a single token
pub type TrimPredicate = fn(&Token) -> bool;

/// Named trim rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimRule {
    Stop,
    Punct,
    Space,
}

impl TrimRule {
    pub const ALL: [TrimRule; 3] = [Self::Stop, Self::Punct, Self::Space];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Punct => "punct",
            Self::Space => "space",
        }
    }

    pub fn predicate(&self) -> TrimPredicate {
        match self {
            Self::Stop => |t: &Token| t.is_stop,
            Self::Punct => |t: &Token| t.is_punct,
            Self::Space => |t: &Token| t.is_space,
        }
    }

    #[inline]
    pub fn applies(&self, token: &Token) -> bool {
        (self.predicate())(token)
    }
}

impl fmt::Display for TrimRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrimRule {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        let name = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| SearchError::UnknownTrimRule {
                name: s.to_string(),
                available: Self::ALL.iter().map(|r| r.name().to_string()).collect(),
            })
    }
}

/// Trim rules a searcher supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimRegistry {
    rules: Vec<TrimRule>,
}

impl Default for TrimRegistry {
    fn default() -> Self {
        Self {
            rules: TrimRule::ALL.to_vec(),
        }
    }
}

impl TrimRegistry {
    /// A registry with no trimming support
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rules(rules: impl IntoIterator<Item = TrimRule>) -> Self {
        let mut registry = Self::empty();
        for rule in rules {
            if !registry.rules.contains(&rule) {
                registry.rules.push(rule);
            }
        }
        registry
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(TrimRule::name).collect()
    }

    /// Look up a predicate by rule name (case-insensitive)
    pub fn get(&self, name: &str) -> SearchResult<TrimPredicate> {
        match name.parse::<TrimRule>() {
            Ok(rule) if self.rules.contains(&rule) => Ok(rule.predicate()),
            _ => Err(self.unknown(name)),
        }
    }

    /// Check a typed rule against this registry
    pub fn resolve(&self, rule: TrimRule) -> SearchResult<TrimPredicate> {
        if self.rules.contains(&rule) {
            Ok(rule.predicate())
        } else {
            Err(self.unknown(rule.name()))
        }
    }

    /// Validate every rule of a trim set
    pub fn validate(&self, trims: &TrimSet) -> SearchResult<()> {
        for rule in trims.all_rules() {
            self.resolve(rule)?;
        }
        Ok(())
    }

    fn unknown(&self, name: &str) -> SearchError {
        SearchError::UnknownTrimRule {
            name: name.to_string(),
            available: self.names().into_iter().map(String::from).collect(),
        }
    }
}

/// Trim rules for both edges plus edge-specific extras
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSet {
    pub trimmers: Vec<TrimRule>,
    pub start_trimmers: Vec<TrimRule>,
    pub end_trimmers: Vec<TrimRule>,
}

impl TrimSet {
    /// Same rules on both edges
    pub fn both(rules: impl IntoIterator<Item = TrimRule>) -> Self {
        Self {
            trimmers: rules.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trimmers.is_empty() && self.start_trimmers.is_empty() && self.end_trimmers.is_empty()
    }

    /// Rules applied at the start edge
    pub fn start_rules(&self) -> Vec<TrimRule> {
        union(&self.trimmers, &self.start_trimmers)
    }

    /// Rules applied at the end edge
    pub fn end_rules(&self) -> Vec<TrimRule> {
        union(&self.trimmers, &self.end_trimmers)
    }

    fn all_rules(&self) -> impl Iterator<Item = TrimRule> + '_ {
        self.trimmers
            .iter()
            .chain(&self.start_trimmers)
            .chain(&self.end_trimmers)
            .copied()
    }
}

fn union(a: &[TrimRule], b: &[TrimRule]) -> Vec<TrimRule> {
    let mut rules = a.to_vec();
    for rule in b {
        if !rules.contains(rule) {
            rules.push(*rule);
        }
    }
    rules
}

#[inline]
fn trimmable(token: &Token, rules: &[TrimRule]) -> bool {
    rules.iter().any(|rule| rule.applies(token))
}

/// Advance `start` past trimmable tokens. `None` when it runs into `end`.
pub fn enforce_start(doc: &Doc, start: usize, end: usize, rules: &[TrimRule]) -> Option<usize> {
    let end = end.min(doc.len());
    let mut start = start;
    while start < end && trimmable(&doc[start], rules) {
        start += 1;
    }
    (start < end).then_some(start)
}

/// Retreat `end` past trimmable tokens. `None` when it runs into `start`.
pub fn enforce_end(doc: &Doc, start: usize, end: usize, rules: &[TrimRule]) -> Option<usize> {
    let mut end = end.min(doc.len());
    while end > start && trimmable(&doc[end - 1], rules) {
        end -= 1;
    }
    (end > start).then_some(end)
}

/// Span bounds after trimming; a collapsed side is `None`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimmedBounds {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl TrimmedBounds {
    /// The trimmed span, or `None` if either side collapsed
    pub fn span(&self) -> Option<(usize, usize)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }
}

/// Apply a trim set to `[start, end)`.
///
/// Both edges are evaluated against the original bounds. A collapsed side
/// leaves the other side at its original value.
pub fn enforce(doc: &Doc, start: usize, end: usize, trims: &TrimSet) -> TrimmedBounds {
    let start_rules = trims.start_rules();
    let end_rules = trims.end_rules();

    let new_start = if start_rules.is_empty() {
        Some(start)
    } else {
        enforce_start(doc, start, end, &start_rules)
    };
    if new_start.is_none() {
        return TrimmedBounds {
            start: None,
            end: Some(end),
        };
    }

    let new_end = if end_rules.is_empty() {
        Some(end)
    } else {
        enforce_end(doc, start, end, &end_rules)
    };
    TrimmedBounds {
        start: if new_end.is_some() { new_start } else { Some(start) },
        end: new_end,
    }
}
