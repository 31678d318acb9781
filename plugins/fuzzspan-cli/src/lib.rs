//! fuzzspan command-line front end
//!
//! Tokenizes plain text, registers labeled patterns from flags or a JSON
//! config and reports matches as JSON lines.

pub mod config;
pub mod error;
pub mod run;
pub mod tokenize;

pub use config::{CliConfig, PatternSpec};
pub use error::{CliError, CliResult};
pub use run::{build_matcher, search_lines, search_text, MatchRecord};
pub use tokenize::{is_stop_word, tokenize, Tokenizer};
