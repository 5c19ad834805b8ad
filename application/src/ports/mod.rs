//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! All three share [`GatewayError`](llm_gateway::GatewayError) for
//! transport-level failures.

pub mod http_fetcher;
pub mod llm_gateway;
pub mod search_provider;
