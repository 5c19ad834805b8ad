//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of every tool invocation.
//! Each execution produces exactly one [`ToolResult`], carrying either the
//! tool's typed payload or an error message, plus [`ToolResultMetadata`]
//! (timing, token usage, cost, source).
//!
//! The error side is modelled by [`ToolError`]. Its variants map to stable
//! machine codes (see [`ToolError::code`]) which are copied into
//! [`ToolResultMetadata::error_code`] so callers can tell a timeout apart
//! from a business failure without parsing the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised while executing a tool.
///
/// | Code | Retried by tools? | Description |
/// |------|-------------------|-------------|
/// | `INVALID_INPUT` | No | Payload failed deserialization or validation |
/// | `DISABLED` | No | Tool (or its registry entry) is disabled |
/// | `TIMEOUT` | No | Lifecycle deadline expired, work abandoned |
/// | `NOT_FOUND` | No | Unknown tool name |
/// | `UPSTREAM` | Yes | Transport/provider failure (HTTP, LLM, search) |
/// | `EXTRACTION` | No | Page content could not be extracted |
/// | `INVALID_RESPONSE` | No | Upstream payload had no safe interpretation |
/// | `EXECUTION_FAILED` | No | Anything else |
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("Invalid input provided")]
    InvalidInput,

    #[error("Tool is disabled")]
    Disabled,

    #[error("Tool execution timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Content extraction failed: {0}")]
    Extraction(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Execution failed: {0}")]
    Execution(String),
}

impl ToolError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::InvalidInput => "INVALID_INPUT",
            ToolError::Disabled => "DISABLED",
            ToolError::Timeout { .. } => "TIMEOUT",
            ToolError::NotFound(_) => "NOT_FOUND",
            ToolError::Upstream(_) => "UPSTREAM",
            ToolError::Extraction(_) => "EXTRACTION",
            ToolError::InvalidResponse(_) => "INVALID_RESPONSE",
            ToolError::Execution(_) => "EXECUTION_FAILED",
        }
    }

    /// Whether a tool may retry the operation that produced this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ToolError::Upstream(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ToolError::Timeout { .. })
    }
}

/// Structured metadata about a tool execution.
///
/// `duration_ms` is stamped by the execution lifecycle on every path;
/// the remaining fields are filled by tools that know them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultMetadata {
    /// Wall-clock duration of the execution in milliseconds
    #[serde(rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Tokens consumed from an upstream completion service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    /// Monetary cost reported by the upstream provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Where the data came from (provider name, URL, cache)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Code of the [`ToolError`] for failed executions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Tool-specific extras
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Uniform result envelope returned by every tool execution.
///
/// By convention `success == true` implies `data` is present and `error`
/// absent, while `success == false` implies `error` is present. The
/// constructors below are the only way tools build results, which keeps
/// that convention intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult<T> {
    /// Whether the execution was successful
    pub success: bool,
    /// Payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

impl<T> ToolResult<T> {
    /// Create a successful result
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result from a [`ToolError`]
    pub fn failure(error: &ToolError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            metadata: ToolResultMetadata {
                error_code: Some(error.code().to_string()),
                ..Default::default()
            },
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_tokens_used(mut self, tokens: u64) -> Self {
        self.metadata.tokens_used = Some(tokens);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// Attach a tool-specific metadata entry
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether this result is a lifecycle timeout
    pub fn is_timeout(&self) -> bool {
        self.metadata.error_code.as_deref() == Some("TIMEOUT")
    }

    /// Transform the payload, keeping status and metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ToolResult<U> {
        ToolResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_messages() {
        assert_eq!(ToolError::InvalidInput.to_string(), "Invalid input provided");
        assert_eq!(ToolError::Disabled.to_string(), "Tool is disabled");
        assert_eq!(
            ToolError::NotFound("web_search".into()).to_string(),
            "Tool not found: web_search"
        );
        assert_eq!(ToolError::Timeout { timeout_ms: 50 }.code(), "TIMEOUT");
    }

    #[test]
    fn test_only_upstream_errors_are_retryable() {
        assert!(ToolError::Upstream("503".into()).is_retryable());
        assert!(!ToolError::InvalidInput.is_retryable());
        assert!(!ToolError::Timeout { timeout_ms: 1 }.is_retryable());
        assert!(!ToolError::Extraction("empty".into()).is_retryable());
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("page text").with_duration(12).with_source("cache");

        assert!(result.is_success());
        assert_eq!(result.data(), Some(&"page text"));
        assert!(result.error().is_none());
        assert_eq!(result.metadata.duration_ms, Some(12));
        assert_eq!(result.metadata.source.as_deref(), Some("cache"));
    }

    #[test]
    fn test_tool_result_failure() {
        let result: ToolResult<()> = ToolResult::failure(&ToolError::Timeout { timeout_ms: 100 });

        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert!(result.error().unwrap().contains("timed out"));
        assert!(result.is_timeout());
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let result = ToolResult::success(1)
            .with_duration(5)
            .with_tokens_used(42)
            .with_extra("cached", true);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["metadata"]["duration"], 5);
        assert_eq!(json["metadata"]["tokensUsed"], 42);
        assert_eq!(json["metadata"]["cached"], true);
        assert!(json.get("error").is_none());
    }
}
