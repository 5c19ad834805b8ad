//! Configuration file loader with multi-source merging

use super::file_config::{FileConfig, Severity};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Project-level config file names, first match wins.
const PROJECT_FILES: [&str; 2] = ["sleuth.toml", ".sleuth.toml"];

/// Prefix of environment overrides (`SLEUTH_TOOLS__FETCH__CACHE_TTL_SECS=60`).
const ENV_PREFIX: &str = "SLEUTH_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`SLEUTH_*`, `__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./sleuth.toml` or `./.sleuth.toml`
    /// 4. Global config: `$XDG_CONFIG_HOME/sleuth/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::figment(config_path)
            .extract()
            .map_err(|e| ConfigError::from(Box::new(e)))
    }

    /// Like [`load`](Self::load), but rejects configurations with
    /// error-severity issues. Warnings are logged.
    pub fn load_validated(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let config = Self::load(config_path)?;

        let mut errors = Vec::new();
        for issue in config.validate() {
            match issue.severity {
                Severity::Warning => {
                    tracing::warn!(field = %issue.field, "{}", issue.message);
                }
                Severity::Error => errors.push(format!("{}: {}", issue.field, issue.message)),
            }
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors.join("; ")))
        }
    }

    /// The merged sources, before extraction.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/sleuth/config.toml if set,
    /// otherwise falls back to ~/.config/sleuth/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sleuth").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] Environment: {ENV_PREFIX}*");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{mark}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./sleuth.toml or ./.sleuth.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.registry.max_history_size, 1000);
        assert!(config.tools.search.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("sleuth"));
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[tools.fetch]\ncache_ttl_secs = 5\n\n[tools.analyze]\nenabled = false"
        )
        .unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.tools.fetch.cache_ttl_secs, 5);
        assert_eq!(config.tools.fetch.cache_capacity, 100);
        assert!(!config.tools.analyze.enabled);
        assert!(config.tools.synthesize.enabled);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[tools.fetch]\ncache_ttl_secs = \"soon\"").unwrap();

        let err = ConfigLoader::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_load_validated_rejects_errors() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[registry]\nmax_history_size = 0").unwrap();

        let err = ConfigLoader::load_validated(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("registry.max_history_size"));
    }
}
