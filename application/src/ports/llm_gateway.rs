//! Completion gateway port
//!
//! Defines how LLM-backed tools talk to an upstream completion service.
//! The tools only need "messages in, text out"; everything provider
//! specific (endpoints, headers, wire format) lives in the adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_domain::ToolError;
use thiserror::Error;

/// Errors raised by any upstream port (completion, search, HTTP).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<GatewayError> for ToolError {
    fn from(err: GatewayError) -> Self {
        ToolError::Upstream(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message of a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: model.into(),
            max_tokens: 1024,
            temperature: 0.0,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// A completion response, as content blocks plus usage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionResponse {
    /// Text blocks in the order the provider returned them
    pub content: Vec<String>,
    pub usage: TokenUsage,
    pub model: Option<String>,
}

impl CompletionResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![text.into()],
            ..Default::default()
        }
    }

    /// All text blocks joined together.
    pub fn text(&self) -> String {
        self.content.concat()
    }
}

/// Port for an upstream completion service.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, GatewayError>;
}
