//! Application layer for sleuth
//!
//! This crate defines the tool contract, the execution lifecycle every tool
//! runs through, and the ports the concrete tools call out to.
//! It depends only on the domain layer.

pub mod context;
pub mod lifecycle;
pub mod ports;
pub mod tool;

// Re-export commonly used types
pub use context::ToolContext;
pub use lifecycle::{
    ManagedTool, ToolLogic,
    batch::{BatchOptions, BatchProgress, process_in_batches},
    retry::{RetryPolicy, with_retry},
};
pub use ports::{
    http_fetcher::{HttpFetcher, HttpResponse},
    llm_gateway::{
        ChatMessage, ChatRole, CompletionClient, CompletionRequest, CompletionResponse,
        GatewayError, TokenUsage,
    },
    search_provider::{ProviderResult, SearchProvider, SearchQuery},
};
pub use tool::Tool;
