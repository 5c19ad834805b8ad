//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod providers;
mod tools;

pub use providers::{FileAnthropicConfig, FileProvidersConfig, FileTavilyConfig};
pub use tools::FileToolsConfig;

use serde::{Deserialize, Serialize};
use sleuth_domain::tool::entities::DEFAULT_MAX_HISTORY_SIZE;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key, e.g. `tools.fetch.cache_capacity`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// `[registry]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    /// Execution logs kept in memory (oldest dropped first)
    pub max_history_size: usize,
}

impl Default for FileRegistryConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY_SIZE,
        }
    }
}

/// `[http]` section, shared by every outbound HTTP client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub max_redirects: usize,
    pub verify_tls: bool,
    /// Client-wide request timeout for the API adapters
    pub timeout_secs: u64,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("sleuth/", env!("CARGO_PKG_VERSION"), " (research agent)").to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            max_redirects: 5,
            verify_tls: true,
            timeout_secs: 30,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub registry: FileRegistryConfig,
    pub http: FileHttpConfig,
    pub providers: FileProvidersConfig,
    pub tools: FileToolsConfig,
}

impl FileConfig {
    /// Copy safe to print: inline API keys are masked.
    pub fn redacted(&self) -> Self {
        Self {
            providers: self.providers.redacted(),
            ..self.clone()
        }
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.registry.max_history_size == 0 {
            issues.push(ConfigIssue::error(
                "registry.max_history_size",
                "history size must be at least 1",
            ));
        }

        if self.http.timeout_secs == 0 {
            issues.push(ConfigIssue::error("http.timeout_secs", "timeout cannot be 0"));
        }
        if !self.http.verify_tls {
            issues.push(ConfigIssue::warning(
                "http.verify_tls",
                "TLS certificate verification is disabled",
            ));
        }

        let tools = &self.tools;
        for (section, timeout_ms) in [
            ("tools.search.timeout_ms", tools.search.timeout_ms),
            ("tools.fetch.timeout_ms", tools.fetch.timeout_ms),
            ("tools.fetch.request_timeout_ms", tools.fetch.request_timeout_ms),
            ("tools.analyze.timeout_ms", tools.analyze.timeout_ms),
            ("tools.synthesize.timeout_ms", tools.synthesize.timeout_ms),
        ] {
            if timeout_ms == 0 {
                issues.push(ConfigIssue::error(section, "timeout cannot be 0"));
            }
        }

        if tools.fetch.cache_capacity == 0 {
            issues.push(ConfigIssue::error(
                "tools.fetch.cache_capacity",
                "cache capacity must be at least 1",
            ));
        }
        if tools.search.default_max_results == 0
            || tools.search.default_max_results > sleuth_domain::research::search::MAX_SEARCH_RESULTS
        {
            issues.push(ConfigIssue::error(
                "tools.search.default_max_results",
                "must be between 1 and 100",
            ));
        }

        for (section, temperature) in [
            ("tools.analyze.temperature", tools.analyze.temperature),
            ("tools.synthesize.temperature", tools.synthesize.temperature),
        ] {
            if !(0.0..=1.0).contains(&temperature) {
                issues.push(ConfigIssue::error(section, "temperature must be within [0, 1]"));
            }
        }

        for (section, model) in [
            ("tools.analyze.model", &tools.analyze.model),
            ("tools.synthesize.model", &tools.synthesize.model),
        ] {
            if model.trim().is_empty() {
                issues.push(ConfigIssue::error(section, "model name cannot be empty"));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[registry]
max_history_size = 50

[http]
max_redirects = 2
verify_tls = false

[providers.tavily]
api_key_env = "MY_TAVILY_KEY"

[tools.fetch]
cache_ttl_secs = 60
cache_capacity = 10

[tools.analyze]
model = "claude-haiku"
temperature = 0.1
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.registry.max_history_size, 50);
        assert_eq!(config.http.max_redirects, 2);
        assert!(!config.http.verify_tls);
        assert_eq!(config.providers.tavily.api_key_env, "MY_TAVILY_KEY");
        assert_eq!(config.tools.fetch.cache_ttl_secs, 60);
        assert_eq!(config.tools.fetch.cache_capacity, 10);
        assert_eq!(config.tools.analyze.model, "claude-haiku");
        // Defaults should apply
        assert_eq!(config.tools.analyze.max_tokens, 2000);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_printed_config_hides_keys() {
        let mut config = FileConfig::default();
        config.providers.tavily.api_key = Some("tvly-secret".into());
        config.providers.anthropic.api_key = Some("sk-ant-secret".into());

        let printed = toml::to_string_pretty(&config.redacted()).unwrap();
        assert!(!printed.contains("tvly-secret"));
        assert!(!printed.contains("sk-ant-secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains("TAVILY_API_KEY"));
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.registry.max_history_size, 1000);
        assert_eq!(config.http.max_redirects, 5);
        assert!(config.http.verify_tls);
        assert!(config.http.user_agent.starts_with("sleuth/"));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.registry.max_history_size = 0;
        config.tools.fetch.cache_capacity = 0;
        config.tools.synthesize.temperature = 1.5;
        config.tools.search.timeout_ms = 0;
        config.http.verify_tls = false;

        let issues = config.validate();
        let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"registry.max_history_size"));
        assert!(fields.contains(&"tools.fetch.cache_capacity"));
        assert!(fields.contains(&"tools.synthesize.temperature"));
        assert!(fields.contains(&"tools.search.timeout_ms"));

        let warnings: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "http.verify_tls");
    }
}
