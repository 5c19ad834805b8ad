//! Domain layer for sleuth
//!
//! Pure types and text processing for the research agent's tool layer.
//! No I/O and no async: everything here is testable in isolation.
//!
//! # Modules
//!
//! - [`tool`]: result envelope, error taxonomy, tool configuration and the
//!   records the registry keeps (entry metadata, execution log, statistics)
//! - [`research`]: typed inputs and outputs of the search, fetch, analyze
//!   and synthesize tools, with their validation rules
//! - [`parsing`]: defensive parsers turning free-form LLM responses into
//!   the research types, with table-driven field defaults

pub mod parsing;
pub mod research;
pub mod tool;

// Re-export commonly used types
pub use parsing::Parsed;
pub use tool::{
    HistoryQuery, LlmSettings, ToolConfig, ToolEntryMetadata, ToolError, ToolExecutionLog,
    ToolResult, ToolResultMetadata, ToolSchema, ToolStatistics,
};
