use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use fuzzspan_cli::{build_matcher, search_lines, search_text, CliConfig, PatternSpec};
use fuzzspan_core::{Flex, FuzzyFunc, MatchMode, TrimRule};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "fuzzspan")]
#[command(about = "Fuzzy search for labeled phrases in plain text")]
#[command(version)]
struct Args {
    /// Input file (stdin when omitted)
    file: Option<PathBuf>,

    /// Pattern as LABEL=TEXT; repeatable
    #[arg(short, long = "pattern", value_name = "LABEL=TEXT")]
    patterns: Vec<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Similarity function (simple, partial, token_set, weighted, ...)
    #[arg(long)]
    func: Option<FuzzyFunc>,

    /// Match mode (phrase or token)
    #[arg(long)]
    mode: Option<MatchMode>,

    /// Minimum scan score
    #[arg(long)]
    min_r1: Option<f64>,

    /// Minimum score after boundary optimization
    #[arg(long)]
    min_r2: Option<f64>,

    /// Compare case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Boundary flex in tokens, or "default"
    #[arg(long)]
    flex: Option<Flex>,

    /// Trim rule applied at both edges (stop, punct, space); repeatable
    #[arg(long = "trim")]
    trimmers: Vec<TrimRule>,

    /// Trim rule applied at the start edge only; repeatable
    #[arg(long = "trim-start")]
    start_trimmers: Vec<TrimRule>,

    /// Trim rule applied at the end edge only; repeatable
    #[arg(long = "trim-end")]
    end_trimmers: Vec<TrimRule>,

    /// Maximum matches per pattern (0 for all)
    #[arg(short = 'n', long)]
    max: Option<usize>,

    /// Treat every input line as a separate document
    #[arg(long)]
    lines: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Result<(CliConfig, Option<PathBuf>, bool), Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.searcher.mode = mode;
        }
        let defaults = &mut config.defaults;
        if let Some(func) = self.func {
            defaults.fuzzy_func = func;
        }
        if let Some(min_r1) = self.min_r1 {
            defaults.min_r1 = min_r1;
        }
        if let Some(min_r2) = self.min_r2 {
            defaults.min_r2 = min_r2;
        }
        if self.case_sensitive {
            defaults.ignore_case = false;
        }
        if let Some(flex) = self.flex {
            defaults.flex = flex;
        }
        if !self.trimmers.is_empty() {
            defaults.trims.trimmers = self.trimmers;
        }
        if !self.start_trimmers.is_empty() {
            defaults.trims.start_trimmers = self.start_trimmers;
        }
        if !self.end_trimmers.is_empty() {
            defaults.trims.end_trimmers = self.end_trimmers;
        }
        if let Some(n) = self.max {
            defaults.n = n;
        }
        defaults.validate()?;

        for arg in &self.patterns {
            config.patterns.push(PatternSpec::parse_arg(arg)?);
        }
        if config.patterns.is_empty() {
            return Err("no patterns given; use --pattern LABEL=TEXT or a config file".into());
        }
        Ok((config, self.file, self.lines))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_level.as_str())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!("fuzzspan {}", env!("CARGO_PKG_VERSION"));

    let (config, file, lines) = args.into_config()?;
    let matcher = build_matcher(&config)?;

    let text = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    let records = if lines {
        search_lines(&matcher, &text)?
    } else {
        search_text(&matcher, &text)?
    };
    info!(matches = records.len(), "search complete");

    let mut out = BufWriter::new(io::stdout().lock());
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
