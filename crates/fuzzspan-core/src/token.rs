//! Token and document types consumed by the search engine
//!
//! Tokens are produced by an external tokenizer/annotator. The engine only
//! reads them: it never splits text and never mutates a `Doc`.

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};

/// Punctuation outside the ASCII range commonly produced by tokenizers
const EXTRA_PUNCT: &[char] = &[
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2013}', '\u{2014}', '\u{2026}', '\u{00AB}',
    '\u{00BB}', '\u{00BF}', '\u{00A1}',
];

/// Whether every character of `text` is punctuation
pub fn is_punct_text(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_punctuation() || EXTRA_PUNCT.contains(&c))
}

/// A single annotated token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface form
    pub text: String,
    /// Case-folded form
    pub lower: String,
    /// Followed by whitespace in the source text
    pub whitespace: bool,
    pub is_stop: bool,
    pub is_punct: bool,
    pub is_space: bool,
    /// Position within the containing document
    pub index: usize,
}

impl Token {
    /// Create a token, deriving `lower`, `is_punct` and `is_space` from the text
    pub fn new(index: usize, text: impl Into<String>, whitespace: bool) -> Self {
        let text = text.into();
        Self {
            lower: text.to_lowercase(),
            is_punct: is_punct_text(&text),
            is_space: !text.is_empty() && text.chars().all(char::is_whitespace),
            is_stop: false,
            whitespace,
            index,
            text,
        }
    }

    /// Set the stop-word flag
    pub fn with_stop(mut self, is_stop: bool) -> Self {
        self.is_stop = is_stop;
        self
    }

    /// Text used for comparison
    #[inline]
    pub fn form(&self, ignore_case: bool) -> &str {
        if ignore_case {
            &self.lower
        } else {
            &self.text
        }
    }
}

/// An ordered, validated token sequence (document or query)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Token>", into = "Vec<Token>")]
pub struct Doc {
    tokens: Vec<Token>,
}

impl Doc {
    /// Build a document from annotated tokens.
    ///
    /// Fails with `InvalidInput` when indices are not `0..len` in order or a
    /// token has empty text.
    pub fn new(tokens: Vec<Token>) -> SearchResult<Self> {
        for (position, token) in tokens.iter().enumerate() {
            if token.index != position {
                return Err(SearchError::InvalidInput(format!(
                    "token '{}' at position {} carries index {}",
                    token.text, position, token.index
                )));
            }
            if token.text.is_empty() {
                return Err(SearchError::InvalidInput(format!(
                    "empty token text at position {}",
                    position
                )));
            }
        }
        Ok(Self { tokens })
    }

    /// Build a document from words and trailing-whitespace flags
    pub fn from_words<S: AsRef<str>>(words: &[S], spaces: &[bool]) -> SearchResult<Self> {
        if words.len() != spaces.len() {
            return Err(SearchError::InvalidInput(format!(
                "{} words but {} whitespace flags",
                words.len(),
                spaces.len()
            )));
        }
        let tokens = words
            .iter()
            .zip(spaces)
            .enumerate()
            .map(|(i, (word, space))| Token::new(i, word.as_ref(), *space))
            .collect();
        Self::new(tokens)
    }

    /// Mark stop words using the annotator's predicate over the lowercase form
    pub fn with_stop_words<F>(mut self, is_stop: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        for token in &mut self.tokens {
            token.is_stop = is_stop(&token.lower);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    /// Text of `[start, end)`, joined with the tokens' own whitespace.
    ///
    /// The range is clipped to the document; an empty range yields `""`.
    pub fn span_text(&self, start: usize, end: usize, ignore_case: bool) -> String {
        let end = end.min(self.tokens.len());
        if start >= end {
            return String::new();
        }
        let span = &self.tokens[start..end];
        let mut text = String::with_capacity(span.iter().map(|t| t.text.len() + 1).sum());
        for (offset, token) in span.iter().enumerate() {
            text.push_str(token.form(ignore_case));
            if token.whitespace && offset + 1 < span.len() {
                text.push(' ');
            }
        }
        text
    }

    /// Full document text
    pub fn text(&self) -> String {
        self.span_text(0, self.tokens.len(), false)
    }
}

impl std::ops::Index<usize> for Doc {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a Doc {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl TryFrom<Vec<Token>> for Doc {
    type Error = SearchError;

    fn try_from(tokens: Vec<Token>) -> SearchResult<Self> {
        Doc::new(tokens)
    }
}

impl From<Doc> for Vec<Token> {
    fn from(doc: Doc) -> Self {
        doc.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_attributes() {
        let token = Token::new(0, "Hello", true);
        assert_eq!(token.lower, "hello");
        assert!(!token.is_punct);
        assert!(!token.is_space);

        assert!(Token::new(0, "...", false).is_punct);
        assert!(Token::new(0, "\u{201C}", false).is_punct);
        assert!(Token::new(0, "  ", false).is_space);
        assert!(!Token::new(0, "a.b", false).is_punct);
    }

    #[test]
    fn test_span_text_uses_whitespace_flags() {
        let doc = Doc::from_words(
            &["G", "-", "rant", "Anderson", "lives"],
            &[false, false, true, true, false],
        )
        .unwrap();
        assert_eq!(doc.span_text(0, 4, false), "G-rant Anderson");
        assert_eq!(doc.span_text(0, 4, true), "g-rant anderson");
        assert_eq!(doc.span_text(2, 3, false), "rant");
        assert_eq!(doc.text(), "G-rant Anderson lives");
    }

    #[test]
    fn test_span_text_clips_and_handles_empty() {
        let doc = Doc::from_words(&["a", "b"], &[true, false]).unwrap();
        assert_eq!(doc.span_text(1, 10, false), "b");
        assert_eq!(doc.span_text(2, 2, false), "");
        assert_eq!(doc.span_text(2, 1, false), "");
    }

    #[test]
    fn test_doc_rejects_bad_indices() {
        let tokens = vec![Token::new(0, "a", true), Token::new(2, "b", false)];
        assert!(matches!(Doc::new(tokens), Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn test_doc_rejects_empty_text() {
        let tokens = vec![Token::new(0, "", false)];
        assert!(matches!(Doc::new(tokens), Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn test_from_words_length_mismatch() {
        let result = Doc::from_words(&["a", "b"], &[true]);
        assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn test_stop_words() {
        let doc = Doc::from_words(&["The", "cow"], &[true, false])
            .unwrap()
            .with_stop_words(|w| w == "the");
        assert!(doc[0].is_stop);
        assert!(!doc[1].is_stop);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[{"text":"a","lower":"a","whitespace":false,"is_stop":false,"is_punct":false,"is_space":false,"index":1}]"#;
        let result: Result<Doc, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let doc = Doc::from_words(&["a"], &[false]).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Doc = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
