//! CLI command definitions

use chorus_domain::MixStrategy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The answer followed by the models used
    Text,
    /// `{"message": ..., "models_used": [...]}`
    Json,
}

impl From<OutputFormat> for chorus_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => chorus_domain::OutputFormat::Text,
            OutputFormat::Json => chorus_domain::OutputFormat::Json,
        }
    }
}

fn parse_strategy(s: &str) -> Result<MixStrategy, String> {
    s.parse::<MixStrategy>().map_err(|e| e.to_string())
}

/// CLI arguments for chorus
#[derive(Parser, Debug)]
#[command(name = "chorus")]
#[command(author, version, about = "Ask several LLMs at once and get one answer")]
#[command(long_about = r#"
Chorus routes each question to the LLM backends best suited for it and fuses
their answers into one response.

1. Routing: the question is classified into topics (code, math, creative,
   recent_events, reasoning, general_knowledge) and matched against each
   backend's strengths and weaknesses
2. Execution: the selected backends are queried concurrently
3. Mixing: multiple answers are fused with best_parts, average or vote

Configuration files are loaded from (in priority order):
1. CHORUS_* environment variables
2. --config <path>     Explicit config file
3. ./chorus.toml       Project-level config
4. ~/.config/chorus/config.toml   Global config

Example:
  chorus "What's the best way to handle errors in Rust?"
  chorus --strategy vote "Is Pluto a planet?"
  chorus --single --output json "Summarize today's headlines"
  chorus --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format (defaults to [output] format, else text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Mixing strategy: best_parts, average or vote
    #[arg(short, long, value_name = "NAME", value_parser = parse_strategy)]
    pub strategy: Option<MixStrategy>,

    /// Consult only the single best backend
    #[arg(long)]
    pub single: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
