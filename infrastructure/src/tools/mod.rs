//! Research tool implementations
//!
//! Concrete tools for the research agent, each a [`ToolLogic`] wrapped in
//! the shared execution lifecycle, plus the [`ToolRegistry`] that owns them.
//!
//! | Tool | Module | Category | Upstream port |
//! |------|--------|----------|---------------|
//! | `web_search` | [`search`] | research | [`SearchProvider`] |
//! | `web_fetch` | [`fetch`] | research | [`HttpFetcher`] |
//! | `analyze_content` | [`analyze`] | analysis | [`CompletionClient`] |
//! | `synthesize_sources` | [`synthesize`] | analysis | [`CompletionClient`] |
//!
//! [`ToolLogic`]: sleuth_application::ToolLogic

pub mod analyze;
pub mod fetch;
pub mod search;
pub mod synthesize;

mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use analyze::{ANALYZE_CONTENT, AnalyzeConfig, AnalyzeTool};
pub use fetch::{ContentCache, FetchConfig, FetchTool, WEB_FETCH};
pub use registry::{RegistryStats, ToolListing, ToolRegistry};
pub use search::{SearchConfig, SearchTool, WEB_SEARCH};
pub use synthesize::{SYNTHESIZE_SOURCES, SynthesizeConfig, SynthesizeTool};

use sleuth_application::{CompletionClient, HttpFetcher, ManagedTool, SearchProvider};
use sleuth_domain::ToolEntryMetadata;
use std::sync::Arc;

use crate::config::FileToolsConfig;

/// Upstream capabilities the research tools are built on.
#[derive(Clone)]
pub struct ResearchPorts {
    pub completion: Arc<dyn CompletionClient>,
    pub search: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn HttpFetcher>,
}

/// Register the four research tools with their categories and tags.
pub fn register_research_tools(registry: &ToolRegistry, ports: ResearchPorts, config: &FileToolsConfig) {
    registry.register(
        ManagedTool::new(SearchTool::new(ports.search, config.search.clone())),
        ToolEntryMetadata::new("research").with_tags(["web", "search"]),
    );
    registry.register(
        ManagedTool::new(FetchTool::new(ports.fetcher, config.fetch.clone())),
        ToolEntryMetadata::new("research").with_tags(["web", "fetch", "content"]),
    );
    registry.register(
        ManagedTool::new(AnalyzeTool::new(
            ports.completion.clone(),
            config.analyze.clone(),
        )),
        ToolEntryMetadata::new("analysis").with_tags(["llm", "extraction"]),
    );
    registry.register(
        ManagedTool::new(SynthesizeTool::new(
            ports.completion,
            config.synthesize.clone(),
        )),
        ToolEntryMetadata::new("analysis").with_tags(["llm", "synthesis"]),
    );
}
