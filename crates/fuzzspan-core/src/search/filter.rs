//! Overlap filter

use super::Match;

/// Drop every match that shares a token with an earlier kept match.
///
/// Input order is the priority order: sort before calling.
pub fn filter_overlapping(matches: impl IntoIterator<Item = Match>) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::new();
    for candidate in matches {
        if !kept.iter().any(|m| m.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }
    kept
}
