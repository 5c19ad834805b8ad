//! Page fetcher for `web_fetch`

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use sleuth_application::{GatewayError, HttpFetcher, HttpResponse};
use std::time::Duration;
use tracing::debug;

use super::{build_client, ensure_success, transport_error};
use crate::config::FileHttpConfig;

/// Maximum response body size (5 MB)
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

pub struct ReqwestHttpFetcher {
    client: reqwest::Client,
}

impl ReqwestHttpFetcher {
    pub fn new(config: &FileHttpConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestHttpFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, GatewayError> {
        debug!(url, timeout_ms = timeout.as_millis() as u64, "fetching page");

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(transport_error)?;
        let mut response = ensure_success(response).await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        check_declared_length(response.content_length(), MAX_BODY_SIZE)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            append_capped(&mut bytes, &chunk, MAX_BODY_SIZE)?;
        }
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            final_url,
            status,
            content_type,
            body,
        })
    }
}

fn too_large(size: u64, limit: usize) -> GatewayError {
    GatewayError::InvalidResponse(format!(
        "response too large: {size} bytes (max: {limit} bytes)"
    ))
}

/// Reject a body whose `Content-Length` already exceeds `limit`.
fn check_declared_length(declared: Option<u64>, limit: usize) -> Result<(), GatewayError> {
    match declared {
        Some(size) if size > limit as u64 => Err(too_large(size, limit)),
        _ => Ok(()),
    }
}

/// Append `chunk`, failing once the body would exceed `limit`.
fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], limit: usize) -> Result<(), GatewayError> {
    let size = buf.len() + chunk.len();
    if size > limit {
        return Err(too_large(size as u64, limit));
    }
    buf.extend_from_slice(chunk);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_length_over_cap() {
        assert!(check_declared_length(None, 10).is_ok());
        assert!(check_declared_length(Some(10), 10).is_ok());
        let err = check_declared_length(Some(11), 10).unwrap_err();
        assert!(err.to_string().contains("response too large: 11 bytes"));
    }

    #[test]
    fn test_streamed_body_capped() {
        let mut body = Vec::new();
        append_capped(&mut body, b"hello", 8).unwrap();
        append_capped(&mut body, b"abc", 8).unwrap();
        let err = append_capped(&mut body, b"!", 8).unwrap_err();

        assert!(matches!(err, GatewayError::InvalidResponse(_)));
        assert_eq!(body, b"helloabc");
    }

    #[test]
    fn test_cap_is_five_megabytes() {
        assert_eq!(MAX_BODY_SIZE, 5_242_880);
    }
}
