//! Infrastructure layer for sleuth
//!
//! This crate contains the concrete research tools, the registry that
//! owns them, the reqwest adapters implementing the application ports,
//! and configuration file loading.

pub mod config;
pub mod http;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use http::{AnthropicCompletionClient, ReqwestHttpFetcher, TavilySearchProvider};
pub use tools::{
    ANALYZE_CONTENT, RegistryStats, ResearchPorts, SYNTHESIZE_SOURCES, ToolListing, ToolRegistry,
    WEB_FETCH, WEB_SEARCH, register_research_tools,
};
