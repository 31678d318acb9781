//! Labeled pattern matcher
//!
//! Stores query patterns under labels and runs one `multi_match` per pattern
//! against each document. Results from all patterns are merged, deduplicated
//! per `(label, start, end)` and handed to the label's callback, if any.

use std::fmt;

use ahash::AHashMap;
use fuzzspan_core::{Doc, FuzzySearcher, SearchError, SearchOptions};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MatcherError, MatcherResult};
use crate::options::{PatternOptions, TrimResolution};

/// Callback run for every match of its label: `(doc, match index, all matches)`
pub type OnMatch = Box<dyn Fn(&Doc, usize, &[LabeledMatch]) + Send + Sync>;

/// A match tagged with the label of the pattern that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMatch {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

impl LabeledMatch {
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

/// Serializable view of a stored pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub label: String,
    pub pattern: String,
    pub options: PatternOptions,
}

struct StoredPattern {
    doc: Doc,
    options: PatternOptions,
}

struct LabelEntry {
    label: String,
    patterns: Vec<StoredPattern>,
    on_match: Option<OnMatch>,
}

/// Matches labeled patterns against documents
pub struct FuzzyMatcher {
    searcher: FuzzySearcher,
    defaults: SearchOptions,
    trim_resolution: TrimResolution,
    entries: Vec<LabelEntry>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(FuzzySearcher::new(), SearchOptions::default())
    }
}

impl fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuzzyMatcher")
            .field("defaults", &self.defaults)
            .field("trim_resolution", &self.trim_resolution)
            .field("labels", &self.labels())
            .finish()
    }
}

impl FuzzyMatcher {
    pub fn new(searcher: FuzzySearcher, defaults: SearchOptions) -> Self {
        Self {
            searcher,
            defaults,
            trim_resolution: TrimResolution::default(),
            entries: Vec::new(),
        }
    }

    pub fn with_trim_resolution(mut self, trim_resolution: TrimResolution) -> Self {
        self.trim_resolution = trim_resolution;
        self
    }

    pub fn defaults(&self) -> &SearchOptions {
        &self.defaults
    }

    pub fn searcher(&self) -> &FuzzySearcher {
        &self.searcher
    }

    /// Register patterns under `label`.
    ///
    /// `options` pairs with `patterns` by position. Missing entries use the
    /// matcher defaults; extra entries are ignored. Adding to an existing
    /// label appends patterns and replaces its callback.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        patterns: Vec<Doc>,
        options: Vec<PatternOptions>,
        on_match: Option<OnMatch>,
    ) -> MatcherResult<()> {
        let label = label.into();
        if !options.is_empty() && options.len() != patterns.len() {
            warn!(
                label = %label,
                patterns = patterns.len(),
                options = options.len(),
                "pattern and option counts differ; missing options use defaults, extras are ignored"
            );
        }

        let mut options = options.into_iter();
        let mut stored = Vec::with_capacity(patterns.len());
        for doc in patterns {
            if doc.is_empty() {
                return Err(SearchError::InvalidInput(format!(
                    "patterns for label '{}' must contain at least one token",
                    label
                ))
                .into());
            }
            let options = options.next().unwrap_or_default();
            let resolved = options.resolve(&self.defaults, self.trim_resolution);
            resolved.validate()?;
            self.searcher.similarity().resolve(resolved.fuzzy_func)?;
            self.searcher.trims().validate(&resolved.trims)?;
            stored.push(StoredPattern { doc, options });
        }

        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(entry) => {
                entry.patterns.extend(stored);
                entry.on_match = on_match;
            }
            None => self.entries.push(LabelEntry {
                label,
                patterns: stored,
                on_match,
            }),
        }
        Ok(())
    }

    /// Remove a label with all its patterns
    pub fn remove(&mut self, label: &str) -> MatcherResult<()> {
        let index = self
            .entries
            .iter()
            .position(|e| e.label == label)
            .ok_or_else(|| MatcherError::UnknownLabel(label.to_string()))?;
        self.entries.remove(index);
        Ok(())
    }

    /// Labels in insertion order
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn patterns(&self) -> Vec<PatternRecord> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry.patterns.iter().map(move |p| PatternRecord {
                    label: entry.label.clone(),
                    pattern: p.doc.text(),
                    options: p.options.clone(),
                })
            })
            .collect()
    }

    /// Match every pattern against `doc` and run callbacks.
    ///
    /// Results are ordered by start, then longest span first, then label.
    pub fn match_doc(&self, doc: &Doc) -> MatcherResult<Vec<LabeledMatch>> {
        let mut best: AHashMap<(usize, usize, usize), f64> = AHashMap::new();
        for (label_idx, entry) in self.entries.iter().enumerate() {
            for pattern in &entry.patterns {
                let opts = pattern.options.resolve(&self.defaults, self.trim_resolution);
                for m in self.searcher.multi_match(doc, &pattern.doc, &opts)? {
                    let score = best.entry((label_idx, m.start, m.end)).or_insert(m.score);
                    if m.score > *score {
                        *score = m.score;
                    }
                }
            }
        }

        let mut matches: Vec<LabeledMatch> = best
            .into_iter()
            .map(|((label_idx, start, end), score)| LabeledMatch {
                label: self.entries[label_idx].label.clone(),
                start,
                end,
                score,
            })
            .collect();
        matches.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| b.width().cmp(&a.width()))
                .then_with(|| a.label.cmp(&b.label))
        });
        debug!(matches = matches.len(), "matched document");

        for entry in &self.entries {
            let Some(on_match) = &entry.on_match else {
                continue;
            };
            for (i, m) in matches.iter().enumerate() {
                if m.label == entry.label {
                    on_match(doc, i, &matches);
                }
            }
        }
        Ok(matches)
    }

    /// Lazily match a stream of documents
    pub fn pipe<'a, I>(
        &'a self,
        docs: I,
    ) -> impl Iterator<Item = MatcherResult<(Doc, Vec<LabeledMatch>)>> + 'a
    where
        I: IntoIterator<Item = Doc>,
        I::IntoIter: 'a,
    {
        docs.into_iter().map(move |doc| {
            let matches = self.match_doc(&doc)?;
            Ok((doc, matches))
        })
    }

    /// Like [`pipe`](Self::pipe), carrying a context value alongside each document
    pub fn pipe_with_context<'a, I, C>(
        &'a self,
        docs: I,
    ) -> impl Iterator<Item = MatcherResult<((Doc, Vec<LabeledMatch>), C)>> + 'a
    where
        I: IntoIterator<Item = (Doc, C)>,
        I::IntoIter: 'a,
        C: 'a,
    {
        docs.into_iter().map(move |(doc, context)| {
            let matches = self.match_doc(&doc)?;
            Ok(((doc, matches), context))
        })
    }

    /// Match a batch of documents, in parallel when enabled
    pub fn match_batch(&self, docs: &[Doc]) -> MatcherResult<Vec<Vec<LabeledMatch>>> {
        #[cfg(feature = "parallel")]
        {
            docs.par_iter().map(|doc| self.match_doc(doc)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            docs.iter().map(|doc| self.match_doc(doc)).collect()
        }
    }
}
