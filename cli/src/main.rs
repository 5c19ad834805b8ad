//! CLI entrypoint for sleuth
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod wiring;

use anyhow::{Context, Result, bail};
use clap::Parser;
use commands::{Cli, Command};
use serde_json::Value;
use sleuth_application::ToolContext;
use sleuth_infrastructure::{ConfigLoader, FileConfig, ToolRegistry, register_research_tools};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load_validated(cli.config.as_deref())?
    };

    match cli.command {
        Command::Config => {
            ConfigLoader::print_config_sources(cli.config.as_deref());
            println!();
            println!("{}", toml::to_string_pretty(&config.redacted())?);
        }
        Command::Tools => {
            let registry = build_registry(&config);
            println!("{}", serde_json::to_string_pretty(&registry.get_tool_schemas())?);
        }
        Command::Run {
            tool,
            input,
            session,
            timeout_ms,
            stats,
        } => {
            let input: Value =
                serde_json::from_str(&input).context("tool input must be valid JSON")?;
            let registry = build_registry(&config);
            if !registry.has_tool(&tool) {
                let known: Vec<_> = registry.list_tools().into_iter().map(|t| t.name).collect();
                bail!("unknown tool '{tool}' (available: {})", known.join(", "));
            }

            let mut ctx = match session {
                Some(id) => ToolContext::for_session(id, None),
                None => ToolContext::new(),
            };
            if let Some(ms) = timeout_ms {
                ctx = ctx.with_timeout(Duration::from_millis(ms));
            }

            info!(tool = %tool, "running tool");
            let result = registry.execute_tool(&tool, input, &ctx).await;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if stats && let Some(statistics) = registry.get_tool_statistics(&tool) {
                println!("{}", serde_json::to_string_pretty(&statistics)?);
            }
        }
    }

    Ok(())
}

fn build_registry(config: &FileConfig) -> ToolRegistry {
    let registry = ToolRegistry::with_max_history(config.registry.max_history_size);
    register_research_tools(&registry, wiring::research_ports(config), &config.tools);
    registry
}
