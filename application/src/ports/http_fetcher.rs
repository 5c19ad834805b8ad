//! HTTP fetch port
//!
//! Plain GET with a per-request timeout. Redirect limits, TLS verification
//! and default headers are adapter configuration.

use async_trait::async_trait;
use std::time::Duration;

use super::llm_gateway::GatewayError;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    /// `Content-Type` header, empty when absent
    pub content_type: String,
    pub body: String,
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Fetch `url`. Only 2xx responses are returned; anything else is a
    /// [`GatewayError::Http`].
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, GatewayError>;
}
