//! Tavily search adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_application::{GatewayError, ProviderResult, SearchProvider, SearchQuery};
use tracing::debug;

use super::{build_client, ensure_success, transport_error};
use crate::config::{FileHttpConfig, FileTavilyConfig};

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    #[serde(flatten)]
    query: &'a SearchQuery,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<ProviderResult>,
}

pub struct TavilySearchProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilySearchProvider {
    /// Fails with [`GatewayError::Configuration`] when no API key resolves.
    pub fn new(config: &FileTavilyConfig, http: &FileHttpConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::Configuration(format!(
                "no Tavily API key: set {} or providers.tavily.api_key",
                config.api_key_env
            ))
        })?;

        Ok(Self {
            client: build_client(http)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for TavilySearchProvider {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderResult>, GatewayError> {
        debug!(
            query = %query.query,
            depth = query.search_depth.as_str(),
            max_results = query.max_results,
            "searching"
        );

        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
        };
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(parsed.results)
    }
}
