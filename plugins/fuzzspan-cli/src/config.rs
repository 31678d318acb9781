//! JSON configuration file

use std::path::Path;

use fuzzspan_core::{SearchOptions, SearcherConfig};
use fuzzspan_matcher::{PatternOptions, TrimResolution};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CliError, CliResult};

/// A labeled pattern given as plain text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub label: String,
    pub pattern: String,
    #[serde(default)]
    pub options: PatternOptions,
}

impl PatternSpec {
    /// Parse a `LABEL=TEXT` command-line argument
    pub fn parse_arg(arg: &str) -> CliResult<Self> {
        match arg.split_once('=') {
            Some((label, pattern)) if !label.trim().is_empty() && !pattern.trim().is_empty() => {
                Ok(Self {
                    label: label.trim().to_string(),
                    pattern: pattern.trim().to_string(),
                    options: PatternOptions::default(),
                })
            }
            _ => Err(CliError::BadPattern(arg.to_string())),
        }
    }
}

/// Everything a run needs besides the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub searcher: SearcherConfig,
    pub defaults: SearchOptions,
    pub trim_resolution: TrimResolution,
    pub patterns: Vec<PatternSpec>,
}

impl CliConfig {
    pub fn from_json(json: &str) -> CliResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.defaults.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            patterns = config.patterns.len(),
            "loaded configuration"
        );
        Ok(config)
    }
}
