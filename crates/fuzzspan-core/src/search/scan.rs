//! Window scanner

use super::rank::CandidateMap;
use crate::similarity::SimilarityFn;
use crate::token::Doc;

/// Scores are whole numbers; halves round to even
#[inline]
pub fn round_score(score: f64) -> f64 {
    score.round_ties_even()
}

/// Rounded similarity of `doc[start..end]` against an already joined query text
#[inline]
pub(crate) fn score_span(
    scorer: SimilarityFn,
    doc: &Doc,
    start: usize,
    end: usize,
    query_text: &str,
    ignore_case: bool,
) -> f64 {
    round_score(scorer(&doc.span_text(start, end, ignore_case), query_text))
}

/// Score every `len(query)`-token window of `doc` against `query`.
///
/// Keeps offsets scoring at least `min_score`.
pub fn scan_doc(
    doc: &Doc,
    query: &Doc,
    scorer: SimilarityFn,
    min_score: f64,
    ignore_case: bool,
) -> CandidateMap {
    let width = query.len();
    let mut candidates = CandidateMap::new();
    if width == 0 || doc.len() < width {
        return candidates;
    }

    let query_text = query.span_text(0, width, ignore_case);
    for start in 0..=doc.len() - width {
        let score = score_span(scorer, doc, start, start + width, &query_text, ignore_case);
        if score >= min_score {
            candidates.insert(start, score);
        }
    }
    candidates
}
