//! Per-tool configuration shared by every tool.
//!
//! Tool-specific configuration structs (search, fetch, analyze, synthesize)
//! carry their own typed options and produce a [`ToolConfig`] for the
//! execution lifecycle. Overrides are applied with struct-update syntax on
//! top of the tool's literal defaults:
//!
//! ```
//! use sleuth_domain::tool::config::ToolConfig;
//!
//! let config = ToolConfig { timeout_ms: 5_000, ..ToolConfig::default() };
//! assert!(config.enabled);
//! assert_eq!(config.max_retries, 3);
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle timeout used when neither the call nor the tool sets one.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Retry budget used when a tool does not set one.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration consulted by the execution lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Disabled tools short-circuit to "Tool is disabled"
    pub enabled: bool,
    /// Upper bound for one execution, in milliseconds
    pub timeout_ms: u64,
    /// Retries a tool may spend on retryable upstream calls
    pub max_retries: u32,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Completion settings used by LLM-backed tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model identifier passed to the completion service
    pub model: String,
    /// Sampling temperature in `[0, 1]`
    pub temperature: f32,
    /// Upper bound for the completion length
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert!(config.enabled);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ToolConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
    }
}
