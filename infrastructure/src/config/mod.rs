//! Configuration file loading for sleuth
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `SLEUTH_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./sleuth.toml` or `./.sleuth.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/sleuth/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, FileAnthropicConfig, FileConfig, FileHttpConfig, FileProvidersConfig,
    FileRegistryConfig, FileTavilyConfig, FileToolsConfig, Severity,
};
pub use loader::{ConfigError, ConfigLoader};
