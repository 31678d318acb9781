use fuzzspan_core::SearchError;
use fuzzspan_matcher::MatcherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error("invalid pattern '{0}': expected LABEL=TEXT")]
    BadPattern(String),
}

pub type CliResult<T> = Result<T, CliError>;
