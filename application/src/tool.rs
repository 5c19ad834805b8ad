//! The contract every registered tool honors.

use async_trait::async_trait;
use serde_json::Value;
use sleuth_domain::{ToolConfig, ToolResult, ToolSchema};

use crate::context::ToolContext;

/// A named, independently invocable capability.
///
/// Object safe so the registry can hold heterogeneous tools behind
/// `Arc<dyn Tool>`. Inputs and outputs are JSON values; typed tools get
/// this implementation from [`ManagedTool`](crate::lifecycle::ManagedTool).
///
/// `execute` never fails: every outcome, including invalid input and
/// timeouts, is a [`ToolResult`].
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn version(&self) -> &str;

    fn config(&self) -> &ToolConfig;

    fn config_mut(&mut self) -> &mut ToolConfig;

    /// Whether `input` would pass the tool's validation.
    async fn validate_input(&self, input: &Value) -> bool;

    /// JSON Schema of the input, precise enough for an LLM to build calls:
    /// required fields, types, enums and defaults.
    fn input_schema(&self) -> Value;

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult<Value>;

    /// `{name, description, input_schema}` for tool selection.
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}
