//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for sleuth
#[derive(Parser, Debug)]
#[command(name = "sleuth")]
#[command(author, version, about = "Research agent tools: search, fetch, analyze, synthesize")]
#[command(long_about = r#"
Run the research agent's tools directly from the command line.

Configuration files are loaded from (in priority order):
1. SLEUTH_* environment variables (e.g. SLEUTH_TOOLS__FETCH__CACHE_TTL_SECS=60)
2. --config <path>     Explicit config file
3. ./sleuth.toml       Project-level config
4. ~/.config/sleuth/config.toml   Global config

Example:
  sleuth tools
  sleuth run web_search '{"query": "rust async runtimes", "maxResults": 5}'
  sleuth run web_fetch '{"url": "https://www.rust-lang.org/"}' --stats
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the JSON schemas of the enabled tools
    Tools,

    /// Execute one tool with a JSON input payload
    Run {
        /// Tool name (web_search, web_fetch, analyze_content, synthesize_sources)
        tool: String,

        /// Input payload as a JSON object
        input: String,

        /// Session id recorded on the tool_call span
        #[arg(long, value_name = "ID")]
        session: Option<String>,

        /// Override the tool's configured timeout
        #[arg(long, value_name = "MS")]
        timeout_ms: Option<u64>,

        /// Print the tool's statistics after the run
        #[arg(long)]
        stats: bool,
    },

    /// Show configuration sources and the effective configuration
    Config,
}
