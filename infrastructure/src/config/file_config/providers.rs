//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Placeholder printed instead of an inline API key.
pub const REDACTED: &str = "<redacted>";

fn redact(api_key: &Option<String>) -> Option<String> {
    api_key.as_ref().map(|_| REDACTED.to_string())
}

/// Read an API key from config or, failing that, from the named variable.
fn resolve_key(api_key: &Option<String>, api_key_env: &str) -> Option<String> {
    api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(api_key_env).ok())
        .filter(|k| !k.trim().is_empty())
}

/// Anthropic API provider configuration (completion service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
        }
    }
}

impl FileAnthropicConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, &self.api_key_env)
    }
}

/// Tavily API provider configuration (search service).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTavilyConfig {
    /// Environment variable name for the API key (default: "TAVILY_API_KEY").
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for FileTavilyConfig {
    fn default() -> Self {
        Self {
            api_key_env: "TAVILY_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.tavily.com".to_string(),
        }
    }
}

impl FileTavilyConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(&self.api_key, &self.api_key_env)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub anthropic: FileAnthropicConfig,
    pub tavily: FileTavilyConfig,
}

impl FileProvidersConfig {
    pub fn redacted(&self) -> Self {
        Self {
            anthropic: FileAnthropicConfig {
                api_key: redact(&self.anthropic.api_key),
                ..self.anthropic.clone()
            },
            tavily: FileTavilyConfig {
                api_key: redact(&self.tavily.api_key),
                ..self.tavily.clone()
            },
        }
    }
}
