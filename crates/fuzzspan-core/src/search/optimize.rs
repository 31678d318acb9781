//! Boundary optimizer
//!
//! Starting from a scanned candidate offset, widens the naive window by up to
//! `flex` tokens on each side and keeps the best-scoring span. The start only
//! moves left and the end only moves right. Both edges are searched jointly
//! so an extra token inside the document span can still be absorbed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::rank::CandidateMap;
use super::scan::score_span;
use super::Match;
use crate::error::{SearchError, SearchResult};
use crate::similarity::SimilarityFn;
use crate::token::Doc;
use crate::trim::{self, TrimSet};

/// How far span boundaries may move from the naive window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "FlexRepr", into = "FlexRepr")]
pub enum Flex {
    /// The query length in tokens
    #[default]
    Default,
    Tokens(usize),
}

impl Flex {
    /// Resolve to a token count for a query of `query_len` tokens
    pub fn resolve(self, query_len: usize) -> usize {
        match self {
            Self::Default => query_len,
            Self::Tokens(flex) => {
                if flex > query_len {
                    warn!(
                        flex,
                        query_len, "flex exceeds query length; matches may overshoot"
                    );
                }
                flex
            }
        }
    }
}

impl From<usize> for Flex {
    fn from(flex: usize) -> Self {
        Self::Tokens(flex)
    }
}

impl fmt::Display for Flex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Tokens(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Flex {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }
        s.parse::<usize>().map(Self::Tokens).map_err(|_| {
            SearchError::InvalidFlex(format!(
                "flex must be 'default' or a non-negative integer, got '{}'",
                s
            ))
        })
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum FlexRepr {
    Tokens(i64),
    Named(String),
}

impl TryFrom<FlexRepr> for Flex {
    type Error = SearchError;

    fn try_from(repr: FlexRepr) -> SearchResult<Self> {
        match repr {
            FlexRepr::Tokens(n) => usize::try_from(n).map(Self::Tokens).map_err(|_| {
                SearchError::InvalidFlex(format!(
                    "flex must be 'default' or a non-negative integer, got {}",
                    n
                ))
            }),
            FlexRepr::Named(name) => name.parse(),
        }
    }
}

impl From<Flex> for FlexRepr {
    fn from(flex: Flex) -> Self {
        match flex {
            Flex::Default => Self::Named("default".to_string()),
            Flex::Tokens(n) => Self::Tokens(i64::try_from(n).unwrap_or(i64::MAX)),
        }
    }
}

/// Refine the candidate at `pos` into the best span within `flex` tokens.
///
/// Candidate starts lie in `pos - flex ..= pos` and candidate ends in
/// `naive_end ..= naive_end + flex`, clamped to the document.
///
/// Ties between pairs go to the smallest total boundary shift, then to the
/// smallest `(start, end)`. The winner is trimmed and rescored; `None` when
/// trimming collapses it or the final score is below `min_score`.
#[allow(clippy::too_many_arguments)]
pub fn adjust_boundaries(
    doc: &Doc,
    query: &Doc,
    candidates: &CandidateMap,
    pos: usize,
    scorer: SimilarityFn,
    min_score: f64,
    ignore_case: bool,
    flex: usize,
    trims: &TrimSet,
) -> Option<Match> {
    let len = doc.len();
    if pos >= len || query.is_empty() {
        return None;
    }

    let query_text = query.span_text(0, query.len(), ignore_case);
    let score_of = |start: usize, end: usize| score_span(scorer, doc, start, end, &query_text, ignore_case);

    let naive = (pos, (pos + query.len()).min(len));
    let mut best = naive;
    let mut best_score = candidates
        .get(&pos)
        .copied()
        .unwrap_or_else(|| score_of(naive.0, naive.1));
    let mut best_shift = 0;

    for left in pos.saturating_sub(flex)..=pos {
        for right in naive.1..=(naive.1 + flex).min(len) {
            if (left, right) == naive {
                continue;
            }
            let score = score_of(left, right);
            let shift = left.abs_diff(naive.0) + right.abs_diff(naive.1);
            let better = score > best_score
                || (score == best_score
                    && (shift < best_shift || (shift == best_shift && (left, right) < best)));
            if better {
                best = (left, right);
                best_score = score;
                best_shift = shift;
            }
        }
    }
    trace!(pos, start = best.0, end = best.1, score = best_score, "aligned span");

    let (start, end) = trim::enforce(doc, best.0, best.1, trims).span()?;
    let score = score_of(start, end);
    (score >= min_score).then(|| Match::new(start, end, score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzz;
    use crate::search::scan::scan_doc;
    use crate::trim::TrimRule;
    use pretty_assertions::assert_eq;

    fn zithromax() -> Doc {
        Doc::from_words(
            &["Patient", "was", "prescribed", "Zithromax", "tablets", "."],
            &[true, true, true, true, false, false],
        )
        .unwrap()
    }

    fn query(words: &[&str], spaces: &[bool]) -> Doc {
        Doc::from_words(words, spaces).unwrap()
    }

    #[test]
    fn test_extends_naive_window() {
        let doc = zithromax();
        let q = query(&["zithromax", "tablet"], &[true, false]);
        let candidates = scan_doc(&doc, &q, fuzz::ratio, 0.0, true);
        assert_eq!(
            candidates,
            CandidateMap::from([(0, 30.0), (1, 27.0), (2, 50.0), (3, 97.0), (4, 50.0)])
        );
        let m = adjust_boundaries(
            &doc,
            &q,
            &candidates,
            3,
            fuzz::ratio,
            70.0,
            true,
            2,
            &TrimSet::default(),
        );
        assert_eq!(m, Some(Match::new(3, 5, 97.0)));
    }

    #[test]
    fn test_zero_flex_keeps_window() {
        let doc = zithromax();
        let q = query(&["zithromax"], &[false]);
        let m = adjust_boundaries(
            &doc,
            &q,
            &CandidateMap::new(),
            3,
            fuzz::ratio,
            0.0,
            true,
            0,
            &TrimSet::default(),
        );
        assert_eq!(m, Some(Match::new(3, 4, 100.0)));
    }

    #[test]
    fn test_below_threshold() {
        let doc = zithromax();
        let q = query(&["capsules"], &[false]);
        let m = adjust_boundaries(
            &doc,
            &q,
            &CandidateMap::new(),
            3,
            fuzz::ratio,
            90.0,
            true,
            1,
            &TrimSet::default(),
        );
        assert_eq!(m, None);
    }

    #[test]
    fn test_trims_punctuation_around_name() {
        let doc = Doc::from_words(
            &[
                "There", "was", "a", "great", "basketball", "player", "named", ":", "Karem",
                "Abdul", "Jabar",
            ],
            &[true, true, true, true, true, true, false, true, true, true, false],
        )
        .unwrap();
        let q = query(&["Kareem", "Abdul", "-", "Jabbar"], &[true, false, false, false]);
        let trims = TrimSet::both([TrimRule::Punct]);
        let candidates = scan_doc(&doc, &q, fuzz::ratio, 0.0, true);
        assert_eq!(candidates.get(&7), Some(&84.0));

        for pos in [7, 8] {
            let m = adjust_boundaries(
                &doc,
                &q,
                &candidates,
                pos,
                fuzz::ratio,
                70.0,
                true,
                4,
                &trims,
            );
            assert_eq!(m, Some(Match::new(8, 11, 89.0)), "from pos {pos}");
        }
    }

    #[test]
    fn test_hyphenated_doc_span() {
        let doc = Doc::from_words(
            &[
                "There", "was", "a", "great", "basketball", "player", "named", ":", "Karem",
                "Abdul", "-", "Jabar",
            ],
            &[true, true, true, true, true, true, false, true, true, false, false, false],
        )
        .unwrap();
        let q = query(&["Kareem", "Abdul", "Jabbar"], &[true, true, false]);
        let candidates = scan_doc(&doc, &q, fuzz::ratio, 0.0, true);
        let m = adjust_boundaries(
            &doc,
            &q,
            &candidates,
            7,
            fuzz::ratio,
            70.0,
            true,
            4,
            &TrimSet::both([TrimRule::Punct]),
        );
        assert_eq!(m, Some(Match::new(8, 12, 89.0)));
    }

    #[test]
    fn test_collapsed_by_trimming() {
        let stop = ["this", "that", "the", "is"];
        let doc = Doc::from_words(&["this", "that", "the", "is"], &[true, true, true, false])
            .unwrap()
            .with_stop_words(|w| stop.contains(&w));
        let q = query(&["that", "the"], &[true, false]);
        let m = adjust_boundaries(
            &doc,
            &q,
            &CandidateMap::new(),
            1,
            fuzz::ratio,
            0.0,
            true,
            2,
            &TrimSet::both([TrimRule::Stop]),
        );
        assert_eq!(m, None);
    }

    #[test]
    fn test_joint_search_absorbs_extra_token() {
        let doc = Doc::from_words(
            &["new", "york", "big", "city", "hall"],
            &[true, true, true, true, false],
        )
        .unwrap();
        let q = query(&["new", "york", "city", "hall"], &[true, true, true, false]);
        let candidates = scan_doc(&doc, &q, fuzz::ratio, 0.0, true);
        assert_eq!(candidates, CandidateMap::from([(0, 74.0), (1, 78.0)]));

        let run = |flex| {
            adjust_boundaries(
                &doc,
                &q,
                &candidates,
                0,
                fuzz::ratio,
                0.0,
                true,
                flex,
                &TrimSet::default(),
            )
        };
        let naive = run(0).unwrap();
        assert_eq!(naive, Match::new(0, 4, 74.0));
        assert_eq!(naive.score, candidates[&0]);
        for flex in [1, 2] {
            let m = run(flex).unwrap();
            assert_eq!(m, Match::new(0, 5, 90.0), "flex {flex}");
            assert!(m.score > naive.score);
        }
    }

    #[test]
    fn test_never_shrinks_naive_window() {
        let doc = Doc::from_words(
            &["G", "-", "rant", "Anderson", "lives", "in", "TN", "."],
            &[false, false, true, true, true, true, false, false],
        )
        .unwrap();
        let q = query(&["Grant", "Andersen"], &[true, false]);
        for pos in 0..doc.len() {
            let naive_end = (pos + q.len()).min(doc.len());
            if let Some(m) = adjust_boundaries(
                &doc,
                &q,
                &CandidateMap::new(),
                pos,
                fuzz::wratio,
                0.0,
                true,
                2,
                &TrimSet::default(),
            ) {
                assert!(m.start <= pos && m.end >= naive_end, "from pos {pos}: {m:?}");
            }
        }
    }

    #[test]
    fn test_out_of_range_position() {
        let doc = zithromax();
        let q = query(&["zithromax"], &[false]);
        let m = adjust_boundaries(
            &doc,
            &q,
            &CandidateMap::new(),
            6,
            fuzz::ratio,
            0.0,
            true,
            1,
            &TrimSet::default(),
        );
        assert_eq!(m, None);
    }

    #[test]
    fn test_flex_parse() {
        assert_eq!("default".parse::<Flex>().unwrap(), Flex::Default);
        assert_eq!(" 3 ".parse::<Flex>().unwrap(), Flex::Tokens(3));
        assert!(matches!("-1".parse::<Flex>(), Err(SearchError::InvalidFlex(_))));
        assert!(matches!("wide".parse::<Flex>(), Err(SearchError::InvalidFlex(_))));
    }

    #[test]
    fn test_flex_resolve() {
        assert_eq!(Flex::Default.resolve(4), 4);
        assert_eq!(Flex::Tokens(1).resolve(4), 1);
        assert_eq!(Flex::Tokens(9).resolve(4), 9);
    }

    #[test]
    fn test_flex_serde() {
        assert_eq!(serde_json::to_string(&Flex::Tokens(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Flex::Default).unwrap(), r#""default""#);
        assert_eq!(
            serde_json::to_string(&Flex::Tokens(usize::MAX)).unwrap(),
            i64::MAX.to_string()
        );
        assert_eq!(serde_json::from_str::<Flex>("2").unwrap(), Flex::Tokens(2));
        assert!(serde_json::from_str::<Flex>("-2").is_err());
    }
}
