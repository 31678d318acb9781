//! Zero-copy rule tokenizer for English text
//!
//! Splits on whitespace, then peels prefix and suffix punctuation, splits
//! hyphens between letters and separates common English clitics.

use fuzzspan_core::token::is_punct_text;
use fuzzspan_core::{Doc, SearchResult};

const PREFIXES: &[char] = &[
    '(', '[', '{', '"', '\'', '`', '$', '#', '<', '¡', '¿', '“', '‘', '«',
];

const SUFFIXES: &[char] = &[
    ')', ']', '}', '"', '\'', '.', ',', ';', ':', '!', '?', '%', '>', '”', '’', '…', '»',
];

const CLITICS: &[&str] = &[
    "n't", "'s", "'m", "'re", "'ve", "'ll", "'d", "n’t", "’s", "’m", "’re", "’ve", "’ll", "’d",
];

/// English stop words, lowercase
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anyone", "anything", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "been", "before", "being", "below", "beside", "between", "both", "but",
    "by", "ca", "can", "cannot", "could", "did", "do", "does", "doing", "done", "down", "due",
    "during", "each", "either", "else", "enough", "even", "ever", "every", "few", "for",
    "from", "further", "get", "give", "go", "had", "has", "have", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into", "is", "it",
    "its", "itself", "just", "least", "less", "made", "make", "many", "may", "me", "might",
    "more", "most", "much", "must", "my", "myself", "n't", "neither", "never", "no", "nobody",
    "none", "nor", "not", "nothing", "now", "of", "off", "often", "on", "once", "one", "only",
    "onto", "or", "other", "others", "our", "ours", "ourselves", "out", "over", "own", "per",
    "perhaps", "please", "put", "quite", "rather", "really", "same", "see", "seem", "several",
    "she", "should", "show", "since", "so", "some", "something", "still", "such", "than",
    "that", "the", "their", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "though", "through", "thus", "to", "together", "too", "toward", "under", "until",
    "up", "upon", "us", "used", "very", "via", "was", "we", "well", "were", "what", "whatever",
    "when", "where", "whether", "which", "while", "who", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves", "'d", "'ll", "'m", "'re", "'s", "'ve",
];

pub fn is_stop_word(lower: &str) -> bool {
    STOP_WORDS.contains(&lower)
}

/// A token slice and whether whitespace follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece<'a> {
    pub text: &'a str,
    pub whitespace: bool,
}

impl<'a> Piece<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            whitespace: false,
        }
    }
}

pub struct Tokenizer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.position += n;
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance(c.len_utf8());
            } else {
                break;
            }
        }
    }

    /// Next whitespace-delimited chunk and whether whitespace follows it
    fn next_chunk(&mut self) -> Option<(&'a str, bool)> {
        self.skip_whitespace();
        if self.position >= self.input.len() {
            return None;
        }
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                break;
            }
            self.advance(c.len_utf8());
        }
        let chunk = &self.input[start..self.position];
        Some((chunk, self.position < self.input.len()))
    }

    pub fn pieces(mut self) -> Vec<Piece<'a>> {
        let mut out = Vec::new();
        while let Some((chunk, whitespace)) = self.next_chunk() {
            let before = out.len();
            split_chunk(chunk, &mut out);
            if out.len() > before {
                if let Some(last) = out.last_mut() {
                    last.whitespace = whitespace;
                }
            }
        }
        out
    }
}

fn is_punct_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    is_punct_text(c.encode_utf8(&mut buf))
}

fn split_chunk<'a>(chunk: &'a str, out: &mut Vec<Piece<'a>>) {
    if chunk.chars().all(is_punct_char) {
        let mut chars = chunk.chars();
        let first = chars.next();
        if chars.all(|c| Some(c) == first) {
            out.push(Piece::new(chunk));
        } else {
            for (i, c) in chunk.char_indices() {
                out.push(Piece::new(&chunk[i..i + c.len_utf8()]));
            }
        }
        return;
    }

    let mut core = chunk;
    while let Some(c) = core.chars().next() {
        if !PREFIXES.contains(&c) || core.len() == c.len_utf8() {
            break;
        }
        out.push(Piece::new(&core[..c.len_utf8()]));
        core = &core[c.len_utf8()..];
    }

    let mut suffixes = Vec::new();
    while let Some(c) = core.chars().next_back() {
        if !SUFFIXES.contains(&c) || core.len() == c.len_utf8() {
            break;
        }
        let mut at = core.len() - c.len_utf8();
        while at > c.len_utf8() && core[..at].ends_with(c) {
            at -= c.len_utf8();
        }
        suffixes.push(&core[at..]);
        core = &core[..at];
    }

    split_infixes(core, out);
    out.extend(suffixes.into_iter().rev().map(Piece::new));
}

/// Split hyphens between letters; the last part may carry a clitic
fn split_infixes<'a>(word: &'a str, out: &mut Vec<Piece<'a>>) {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut start = 0;
    for window in chars.windows(3) {
        let [(_, before), (at, mid), (_, after)] = [window[0], window[1], window[2]];
        if mid == '-' && before.is_alphabetic() && after.is_alphabetic() {
            out.push(Piece::new(&word[start..at]));
            out.push(Piece::new(&word[at..at + 1]));
            start = at + 1;
        }
    }

    let last = &word[start..];
    let lower = last.to_ascii_lowercase();
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let at = last.len() - clitic.len();
            out.push(Piece::new(&last[..at]));
            out.push(Piece::new(&last[at..]));
            return;
        }
    }
    out.push(Piece::new(last));
}

/// Tokenize `text` into a document with stop words marked
pub fn tokenize(text: &str) -> SearchResult<Doc> {
    let pieces = Tokenizer::new(text).pieces();
    let words: Vec<&str> = pieces.iter().map(|p| p.text).collect();
    let spaces: Vec<bool> = pieces.iter().map(|p| p.whitespace).collect();
    Ok(Doc::from_words(&words[..], &spaces)?.with_stop_words(is_stop_word))
}
