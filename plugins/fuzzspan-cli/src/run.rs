//! Matcher construction and text search

use fuzzspan_core::{Doc, FuzzySearcher};
use fuzzspan_matcher::{FuzzyMatcher, LabeledMatch};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::tokenize::tokenize;

/// One output line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
    pub text: String,
}

impl MatchRecord {
    fn new(doc: &Doc, m: LabeledMatch, line: Option<usize>) -> Self {
        Self {
            line,
            text: doc.span_text(m.start, m.end, false),
            label: m.label,
            start: m.start,
            end: m.end,
            score: m.score,
        }
    }
}

/// Build a matcher holding every configured pattern
pub fn build_matcher(config: &CliConfig) -> CliResult<FuzzyMatcher> {
    let searcher = FuzzySearcher::with_config(config.searcher.clone());
    let mut matcher = FuzzyMatcher::new(searcher, config.defaults.clone())
        .with_trim_resolution(config.trim_resolution);
    for spec in &config.patterns {
        let pattern = tokenize(&spec.pattern)?;
        matcher.add(
            spec.label.clone(),
            vec![pattern],
            vec![spec.options.clone()],
            None,
        )?;
    }
    debug!(labels = matcher.len(), "matcher ready");
    Ok(matcher)
}

/// Search `text` as a single document
pub fn search_text(matcher: &FuzzyMatcher, text: &str) -> CliResult<Vec<MatchRecord>> {
    let doc = tokenize(text)?;
    let matches = matcher.match_doc(&doc)?;
    Ok(matches
        .into_iter()
        .map(|m| MatchRecord::new(&doc, m, None))
        .collect())
}

/// Search every line of `text` as its own document; lines are 1-based
pub fn search_lines(matcher: &FuzzyMatcher, text: &str) -> CliResult<Vec<MatchRecord>> {
    let docs = text
        .lines()
        .enumerate()
        .map(|(i, line)| -> CliResult<(Doc, usize)> { Ok((tokenize(line)?, i + 1)) })
        .collect::<CliResult<Vec<_>>>()?;

    let mut records = Vec::new();
    for result in matcher.pipe_with_context(docs) {
        let ((doc, matches), line) = result?;
        records.extend(
            matches
                .into_iter()
                .map(|m| MatchRecord::new(&doc, m, Some(line))),
        );
    }
    Ok(records)
}
