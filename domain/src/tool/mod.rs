//! Tool domain module
//!
//! This module defines the value types shared by every tool of the research
//! agent: how a tool reports its outcome, how it is configured and what
//! the registry records about it.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ ToolConfig   │───▶│ execution    │───▶│ ToolResult<T>    │
//! │ (per tool)   │    │ lifecycle    │    │ (one per call)   │
//! └──────────────┘    └──────┬───────┘    └──────────────────┘
//!                            │
//!                            ▼
//!                     ToolExecutionLog ──▶ ToolStatistics
//!                     (registry history)
//! ```
//!
//! # Key Types
//!
//! - [`ToolResult`]: success/error envelope with [`ToolResultMetadata`](value_objects::ToolResultMetadata)
//! - [`ToolError`]: error taxonomy with stable codes
//! - [`ToolConfig`]: `enabled` / `timeout_ms` / `max_retries`
//! - [`ToolEntryMetadata`]: registry-side category, tags and usage counters
//! - [`ToolExecutionLog`] / [`ToolStatistics`]: bounded history and its aggregates
//! - [`ToolSchema`]: `{name, description, input_schema}` for LLM tool selection

pub mod config;
pub mod entities;
pub mod value_objects;

pub use config::{LlmSettings, ToolConfig};
pub use entities::{HistoryQuery, ToolEntryMetadata, ToolExecutionLog, ToolSchema, ToolStatistics};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
