//! Adapter wiring from the loaded configuration
//!
//! A port whose adapter cannot be built (usually a missing API key) is
//! replaced by [`Unavailable`], so the other tools keep working and calls
//! to the affected one fail with the configuration error.

use async_trait::async_trait;
use sleuth_application::{
    CompletionClient, CompletionRequest, CompletionResponse, GatewayError, HttpFetcher,
    HttpResponse, ProviderResult, SearchProvider, SearchQuery,
};
use sleuth_infrastructure::{
    AnthropicCompletionClient, FileConfig, ReqwestHttpFetcher, ResearchPorts,
    TavilySearchProvider,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Stand-in for a port whose adapter failed to build.
struct Unavailable(GatewayError);

#[async_trait]
impl CompletionClient for Unavailable {
    async fn complete(&self, _: CompletionRequest) -> Result<CompletionResponse, GatewayError> {
        Err(self.0.clone())
    }
}

#[async_trait]
impl SearchProvider for Unavailable {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn search(&self, _: &SearchQuery) -> Result<Vec<ProviderResult>, GatewayError> {
        Err(self.0.clone())
    }
}

#[async_trait]
impl HttpFetcher for Unavailable {
    async fn get(&self, _: &str, _: Duration) -> Result<HttpResponse, GatewayError> {
        Err(self.0.clone())
    }
}

fn unavailable(port: &str, err: GatewayError) -> Unavailable {
    warn!(port, error = %err, "adapter unavailable");
    Unavailable(err)
}

pub fn research_ports(config: &FileConfig) -> ResearchPorts {
    let completion: Arc<dyn CompletionClient> =
        match AnthropicCompletionClient::new(&config.providers.anthropic, &config.http) {
            Ok(client) => Arc::new(client),
            Err(err) => Arc::new(unavailable("completion", err)),
        };
    let search: Arc<dyn SearchProvider> =
        match TavilySearchProvider::new(&config.providers.tavily, &config.http) {
            Ok(provider) => Arc::new(provider),
            Err(err) => Arc::new(unavailable("search", err)),
        };
    let fetcher: Arc<dyn HttpFetcher> = match ReqwestHttpFetcher::new(&config.http) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(err) => Arc::new(unavailable("fetch", err)),
    };

    ResearchPorts {
        completion,
        search,
        fetcher,
    }
}
