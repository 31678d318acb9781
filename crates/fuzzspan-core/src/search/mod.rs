//! Fuzzy span search
//!
//! A search runs in three stages:
//! 1. `scan`: score every query-length window of the document
//! 2. `optimize`: refine candidate windows by moving their boundaries
//! 3. `filter`: rank refined spans and drop overlaps

pub mod filter;
pub mod optimize;
pub mod rank;
pub mod scan;

use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use filter::filter_overlapping;
pub use optimize::{adjust_boundaries, Flex};
pub use rank::{index_of_max, indices_of_top_n, CandidateMap};
pub use scan::{round_score, scan_doc};

use crate::config::{SearchOptions, SearcherConfig};
use crate::error::{SearchError, SearchResult};
use crate::similarity::{FuzzyFunc, SimilarityFn, SimilarityRegistry};
use crate::token::Doc;
use crate::trim::{self, TrimRegistry, TrimSet};

/// A matched span `[start, end)` of document tokens and its score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

impl Match {
    pub fn new(start: usize, end: usize, score: f64) -> Self {
        Self { start, end, score }
    }

    /// Number of tokens covered
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// Whether the two spans share at least one token
    pub fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn as_tuple(&self) -> (usize, usize, f64) {
        (self.start, self.end, self.score)
    }
}

/// Searcher over token documents.
///
/// Holds the similarity and trim registries; everything else comes in per
/// call through [`SearchOptions`].
#[derive(Debug, Clone)]
pub struct FuzzySearcher {
    similarity: SimilarityRegistry,
    trims: TrimRegistry,
    config: SearcherConfig,
}

impl Default for FuzzySearcher {
    fn default() -> Self {
        Self::new()
    }
}

struct Prepared {
    scorer: SimilarityFn,
    flex: usize,
}

impl FuzzySearcher {
    pub fn new() -> Self {
        Self::with_config(SearcherConfig::default())
    }

    pub fn with_config(config: SearcherConfig) -> Self {
        Self {
            similarity: SimilarityRegistry::new(config.mode),
            trims: TrimRegistry::with_rules(config.trim_rules.iter().copied()),
            config,
        }
    }

    /// Use custom registries with the default thresholds
    pub fn with_registries(similarity: SimilarityRegistry, trims: TrimRegistry) -> Self {
        let config = SearcherConfig {
            mode: similarity.mode(),
            ..Default::default()
        };
        Self {
            similarity,
            trims,
            config,
        }
    }

    pub fn similarity(&self) -> &SimilarityRegistry {
        &self.similarity
    }

    pub fn trims(&self) -> &TrimRegistry {
        &self.trims
    }

    pub fn config(&self) -> &SearcherConfig {
        &self.config
    }

    /// Rounded similarity of two texts
    pub fn compare(&self, a: &str, b: &str, func: FuzzyFunc, ignore_case: bool) -> SearchResult<f64> {
        let scorer = self.similarity.resolve(func)?;
        let score = if ignore_case {
            scorer(&a.to_lowercase(), &b.to_lowercase())
        } else {
            scorer(a, b)
        };
        Ok(round_score(score))
    }

    /// Candidate windows scoring at least `opts.min_r1`
    pub fn scan(&self, doc: &Doc, query: &Doc, opts: &SearchOptions) -> SearchResult<CandidateMap> {
        let prepared = self.prepare(query, opts)?;
        Ok(scan_doc(doc, query, prepared.scorer, opts.min_r1, opts.ignore_case))
    }

    /// The single best match, if any
    pub fn best_match(
        &self,
        doc: &Doc,
        query: &Doc,
        opts: &SearchOptions,
    ) -> SearchResult<Option<Match>> {
        let prepared = self.prepare(query, opts)?;
        let candidates = scan_doc(doc, query, prepared.scorer, opts.min_r1, opts.ignore_case);
        let Some(pos) = index_of_max(&candidates) else {
            return Ok(None);
        };
        Ok(adjust_boundaries(
            doc,
            query,
            &candidates,
            pos,
            prepared.scorer,
            opts.min_r2,
            opts.ignore_case,
            prepared.flex,
            &opts.trims,
        ))
    }

    /// Non-overlapping matches, best first, at most `opts.n` (0 for all)
    pub fn multi_match(
        &self,
        doc: &Doc,
        query: &Doc,
        opts: &SearchOptions,
    ) -> SearchResult<Vec<Match>> {
        let prepared = self.prepare(query, opts)?;
        let candidates = scan_doc(doc, query, prepared.scorer, opts.min_r1, opts.ignore_case);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches = self.optimize_all(doc, query, &candidates, &prepared, opts);
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.start.cmp(&b.start))
                .then_with(|| a.end.cmp(&b.end))
        });

        let mut matches = filter_overlapping(matches);
        if opts.n > 0 {
            matches.truncate(opts.n);
        }
        debug!(
            candidates = candidates.len(),
            matches = matches.len(),
            "multi match complete"
        );
        Ok(matches)
    }

    #[cfg(feature = "parallel")]
    fn optimize_all(
        &self,
        doc: &Doc,
        query: &Doc,
        candidates: &CandidateMap,
        prepared: &Prepared,
        opts: &SearchOptions,
    ) -> Vec<Match> {
        let positions: Vec<usize> = candidates.keys().copied().collect();
        let optimize = |&pos: &usize| {
            adjust_boundaries(
                doc,
                query,
                candidates,
                pos,
                prepared.scorer,
                opts.min_r2,
                opts.ignore_case,
                prepared.flex,
                &opts.trims,
            )
        };
        if positions.len() >= self.config.parallel_threshold {
            positions.par_iter().filter_map(optimize).collect()
        } else {
            positions.iter().filter_map(optimize).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn optimize_all(
        &self,
        doc: &Doc,
        query: &Doc,
        candidates: &CandidateMap,
        prepared: &Prepared,
        opts: &SearchOptions,
    ) -> Vec<Match> {
        candidates
            .keys()
            .filter_map(|&pos| {
                adjust_boundaries(
                    doc,
                    query,
                    candidates,
                    pos,
                    prepared.scorer,
                    opts.min_r2,
                    opts.ignore_case,
                    prepared.flex,
                    &opts.trims,
                )
            })
            .collect()
    }

    fn prepare(&self, query: &Doc, opts: &SearchOptions) -> SearchResult<Prepared> {
        opts.validate()?;
        let scorer = self.similarity.resolve(opts.fuzzy_func)?;
        self.trims.validate(&opts.trims)?;
        precheck_query(query, &opts.trims)?;
        Ok(Prepared {
            scorer,
            flex: opts.flex.resolve(query.len()),
        })
    }
}

/// Reject empty queries and warn when trim rules would cut into the query
fn precheck_query(query: &Doc, trims: &TrimSet) -> SearchResult<()> {
    if query.is_empty() {
        return Err(SearchError::InvalidInput(
            "query must contain at least one token".to_string(),
        ));
    }
    if !trims.is_empty() {
        let bounds = trim::enforce(query, 0, query.len(), trims);
        if bounds.span() != Some((0, query.len())) {
            warn!(
                query = %query.text(),
                "trim rules affect the query itself; matches may never reach full score"
            );
        }
    }
    Ok(())
}
