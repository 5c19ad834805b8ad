//! Tool registry entities: registration metadata, execution records and
//! the queries/statistics derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::ToolResult;

/// Default number of execution records a registry retains.
pub const DEFAULT_MAX_HISTORY_SIZE: usize = 1000;

/// Registry-side metadata for one registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEntryMetadata {
    pub category: String,
    pub tags: Vec<String>,
    /// Registry-level gate, independent of the tool's own config
    pub enabled: bool,
    pub usage_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl ToolEntryMetadata {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            tags: Vec::new(),
            enabled: true,
            usage_count: 0,
            last_used: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

impl Default for ToolEntryMetadata {
    fn default() -> Self {
        Self::new("general")
    }
}

/// Immutable record of one execution, appended by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolExecutionLog {
    pub tool_name: String,
    pub input: serde_json::Value,
    pub output: ToolResult<serde_json::Value>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolExecutionLog {
    pub fn new(
        tool_name: impl Into<String>,
        input: serde_json::Value,
        output: ToolResult<serde_json::Value>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let duration_ms = (end_time - start_time).num_milliseconds().max(0) as u64;
        Self {
            tool_name: tool_name.into(),
            input,
            success: output.success,
            error: output.error.clone(),
            output,
            start_time,
            end_time,
            duration_ms,
        }
    }
}

/// Filter for `get_execution_history`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Only records of this tool
    pub tool_name: Option<String>,
    /// Only the most recent `limit` matching records
    pub limit: Option<usize>,
    /// Only successful executions
    pub success_only: bool,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_tool(mut self, name: impl Into<String>) -> Self {
        self.tool_name = Some(name.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn successes_only(mut self) -> Self {
        self.success_only = true;
        self
    }

    pub fn matches(&self, log: &ToolExecutionLog) -> bool {
        if let Some(name) = &self.tool_name
            && &log.tool_name != name
        {
            return false;
        }
        !self.success_only || log.success
    }
}

/// Usage statistics for one tool.
///
/// `usage_count` comes from the registry entry; `success_rate` and
/// `average_duration_ms` are computed from the retained history, so they
/// only cover the most recent `max_history_size` executions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStatistics {
    pub usage_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    pub success_rate: f64,
    #[serde(rename = "averageDuration")]
    pub average_duration_ms: f64,
}

impl ToolStatistics {
    /// Compute statistics from the history records of a single tool.
    pub fn from_history<'a>(
        usage_count: u64,
        last_used: Option<DateTime<Utc>>,
        logs: impl IntoIterator<Item = &'a ToolExecutionLog>,
    ) -> Self {
        let (runs, successes, total_ms) = logs.into_iter().fold((0u64, 0u64, 0u64), |acc, log| {
            (acc.0 + 1, acc.1 + u64::from(log.success), acc.2 + log.duration_ms)
        });

        let (success_rate, average_duration_ms) = if runs == 0 {
            (0.0, 0.0)
        } else {
            (successes as f64 / runs as f64, total_ms as f64 / runs as f64)
        };

        Self {
            usage_count,
            last_used,
            success_rate,
            average_duration_ms,
        }
    }
}

/// Machine-readable description of a tool, used for LLM tool selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}
