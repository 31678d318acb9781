//! Ranking helpers over candidate maps

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Start offset to rounded similarity score, ordered by offset
pub type CandidateMap = BTreeMap<usize, f64>;

/// Key with the highest score; the smallest key wins ties
pub fn index_of_max(scores: &CandidateMap) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (&index, &score) in scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// The `n` best keys by descending score, then ascending key.
///
/// `n == 0` returns the full ranking.
pub fn indices_of_top_n(scores: &CandidateMap, n: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().map(|(&i, &s)| (i, s)).collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    if n > 0 {
        ranked.truncate(n);
    }
    ranked.into_iter().map(|(index, _)| index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(usize, f64)]) -> CandidateMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_index_of_max_prefers_earliest() {
        assert_eq!(index_of_max(&map(&[(1, 30.0), (8, 100.0), (9, 100.0)])), Some(8));
    }

    #[test]
    fn test_index_of_max_empty() {
        assert_eq!(index_of_max(&CandidateMap::new()), None);
    }

    #[test]
    fn test_indices_of_top_n() {
        let scores = map(&[(1, 30.0), (4, 50.0), (5, 50.0), (9, 100.0)]);
        assert_eq!(indices_of_top_n(&scores, 3), vec![9, 4, 5]);
        assert_eq!(indices_of_top_n(&scores, 0), vec![9, 4, 5, 1]);
        assert_eq!(indices_of_top_n(&scores, 10), vec![9, 4, 5, 1]);
    }

    #[test]
    fn test_indices_of_top_n_empty() {
        assert!(indices_of_top_n(&CandidateMap::new(), 3).is_empty());
        assert!(indices_of_top_n(&CandidateMap::new(), 0).is_empty());
    }
}
