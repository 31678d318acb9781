use fuzzspan_core::SearchError;
use thiserror::Error;

/// Errors raised by the labeled matcher
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MatcherError {
    #[error("label '{0}' does not exist in this matcher")]
    UnknownLabel(String),

    #[error(transparent)]
    Search(#[from] SearchError),
}

pub type MatcherResult<T> = Result<T, MatcherError>;
