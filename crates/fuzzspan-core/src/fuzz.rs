//! String similarity functions
//!
//! Every function maps two strings to a score in `0.0..=100.0`. Comparison is
//! per character with no preprocessing: callers decide about case folding.
//!
//! The ratio family is built on the indel (insert/delete) normalized
//! similarity, `2 * LCS / (|a| + |b|)`. `jaro_winkler_ratio` and
//! `levenshtein_ratio` wrap strsim.

use std::collections::BTreeSet;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Weight applied to token based scores inside `wratio`
const UNBASE_SCALE: f64 = 0.95;

/// Length of the longest common subsequence
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[inline]
fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let distance = total - 2 * lcs_len(a, b);
    100.0 * (1.0 - distance as f64 / total as f64)
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

/// Sorted whitespace tokens joined by a single space
fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join_set(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(" ")
}

/// Plain indel ratio
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_chars(&chars(a), &chars(b))
}

/// Best alignment of `needle` against windows of `haystack` (needle is the shorter)
fn partial_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let len1 = needle.len();
    let len2 = haystack.len();
    let mut best = 0.0;

    // Windows sticking out on the left
    for i in 1..len1 {
        if !needle.contains(&haystack[i - 1]) {
            continue;
        }
        let score = ratio_chars(needle, &haystack[..i]);
        if score > best {
            best = score;
            if best == 100.0 {
                return best;
            }
        }
    }

    for i in 0..len2 - len1 {
        if !needle.contains(&haystack[i + len1 - 1]) {
            continue;
        }
        let score = ratio_chars(needle, &haystack[i..i + len1]);
        if score > best {
            best = score;
            if best == 100.0 {
                return best;
            }
        }
    }

    // Windows sticking out on the right
    for i in len2 - len1..len2 {
        if !needle.contains(&haystack[i]) {
            continue;
        }
        let score = ratio_chars(needle, &haystack[i..]);
        if score > best {
            best = score;
            if best == 100.0 {
                return best;
            }
        }
    }

    best
}

fn partial_ratio_chars(a: &[char], b: &[char]) -> f64 {
    let (shorter, longer) = if a.len() > b.len() { (b, a) } else { (a, b) };
    if shorter.is_empty() {
        return if longer.is_empty() { 100.0 } else { 0.0 };
    }
    let mut best = partial_alignment(shorter, longer);
    if best != 100.0 && shorter.len() == longer.len() {
        best = best.max(partial_alignment(longer, shorter));
    }
    best
}

/// Substring-tolerant ratio: the shorter string against the best window of the longer
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    partial_ratio_chars(&chars(a), &chars(b))
}

/// Ratio after sorting whitespace tokens
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Partial ratio after sorting whitespace tokens
pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Order and duplicate insensitive ratio over token sets
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: BTreeSet<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: BTreeSet<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: BTreeSet<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One set contains the other
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = chars(&join_set(&diff_ab));
    let diff_ba_joined = chars(&join_set(&diff_ba));
    let ab_len = diff_ab_joined.len();
    let ba_len = diff_ba_joined.len();
    let sect_len = join_set(&intersection).chars().count();

    // Lengths of "sect + ab" and "sect + ba" including the joining space
    let sep = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + sep + ab_len;
    let sect_ba_len = sect_len + sep + ba_len;

    let total = sect_ab_len + sect_ba_len;
    let distance = ab_len + ba_len - 2 * lcs_len(&diff_ab_joined, &diff_ba_joined);
    let result = if total == 0 {
        0.0
    } else {
        100.0 * (1.0 - distance as f64 / total as f64)
    };

    if sect_len == 0 {
        return result;
    }

    let sect_ab_ratio = 100.0 * (1.0 - (sep + ab_len) as f64 / (sect_len + sect_ab_len) as f64);
    let sect_ba_ratio = 100.0 * (1.0 - (sep + ba_len) as f64 / (sect_len + sect_ba_len) as f64);
    result.max(sect_ab_ratio).max(sect_ba_ratio)
}

/// Partial ratio over token set differences; any shared token scores 100
pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }
    partial_ratio(&join_set(&tokens_a), &join_set(&tokens_b))
}

/// Max of `token_set_ratio` and `token_sort_ratio`
pub fn token_ratio(a: &str, b: &str) -> f64 {
    token_set_ratio(a, b).max(token_sort_ratio(a, b))
}

/// Max of the partial token set and partial token sort scores
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let split_a: Vec<&str> = a.split_whitespace().collect();
    let split_b: Vec<&str> = b.split_whitespace().collect();
    let tokens_a: BTreeSet<&str> = split_a.iter().copied().collect();
    let tokens_b: BTreeSet<&str> = split_b.iter().copied().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    if tokens_a.intersection(&tokens_b).next().is_some() {
        return 100.0;
    }

    let result = partial_ratio(&sorted_tokens(a), &sorted_tokens(b));

    // Without duplicates the set difference is the sorted token list itself
    if split_a.len() == tokens_a.len() && split_b.len() == tokens_b.len() {
        return result;
    }
    result.max(partial_ratio(&join_set(&tokens_a), &join_set(&tokens_b)))
}

/// Weighted composite of the other ratios, driven by the length ratio
pub fn wratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = if len_a > len_b {
        len_a / len_b
    } else {
        len_b / len_a
    };

    let end_ratio = ratio(a, b);
    if len_ratio < 1.5 {
        return end_ratio.max(token_ratio(a, b) * UNBASE_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    let end_ratio = end_ratio.max(partial_ratio(a, b) * partial_scale);
    end_ratio.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale)
}

/// Plain ratio that scores 0 when either side is empty
pub fn qratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    ratio(a, b)
}

/// Jaro-Winkler similarity scaled to 0..100
pub fn jaro_winkler_ratio(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 100.0
}

/// Normalized Levenshtein similarity scaled to 0..100
pub fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}
