//! Search provider port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_domain::research::SearchDepth;

use super::llm_gateway::GatewayError;

/// Query sent to the upstream search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    pub search_depth: SearchDepth,
    pub max_results: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_domains: Vec<String>,
}

/// A raw result as the provider reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "publishedDate")]
    pub published_date: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name, recorded as the result source
    fn name(&self) -> &str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<ProviderResult>, GatewayError>;
}
