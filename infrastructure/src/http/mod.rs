//! reqwest-backed adapters for the upstream ports
//!
//! - [`ReqwestHttpFetcher`]: plain page fetches for `web_fetch`
//! - [`AnthropicCompletionClient`]: the completion service behind
//!   `analyze_content` and `synthesize_sources`
//! - [`TavilySearchProvider`]: the search service behind `web_search`
//!
//! All three share [`build_client`] so default headers, redirect limits
//! and TLS verification come from the single `[http]` config section.

mod anthropic;
mod fetcher;
mod tavily;

pub use anthropic::AnthropicCompletionClient;
pub use fetcher::ReqwestHttpFetcher;
pub use tavily::TavilySearchProvider;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use sleuth_application::GatewayError;
use std::time::Duration;

use crate::config::FileHttpConfig;

/// Build a client from the `[http]` section.
pub(crate) fn build_client(config: &FileHttpConfig) -> Result<reqwest::Client, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("user_agent", &config.user_agent)?);
    headers.insert(ACCEPT, header_value("accept", &config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept_language", &config.accept_language)?,
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(!config.verify_tls)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue, GatewayError> {
    HeaderValue::from_str(value)
        .map_err(|e| GatewayError::Configuration(format!("invalid http.{field}: {e}")))
}

/// Map a transport-level reqwest error onto the port taxonomy.
pub(crate) fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_decode() {
        GatewayError::InvalidResponse(err.to_string())
    } else {
        GatewayError::Connection(err.to_string())
    }
}

/// Turn a non-2xx response into [`GatewayError::Http`], keeping the body.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Http {
        status: status.as_u16(),
        body,
    })
}
