//! Execution lifecycle shared by every tool.
//!
//! Concrete tools implement [`ToolLogic`] with typed input and output;
//! [`ManagedTool`] wraps them into a [`Tool`] and runs the fixed sequence:
//!
//! 1. log start
//! 2. deserialize and validate the input (`"Invalid input provided"`)
//! 3. check `config.enabled` (`"Tool is disabled"`)
//! 4. run the logic under a timeout (`ctx.timeout`, else `config.timeout_ms`)
//! 5. stamp `metadata.duration` on the result
//! 6. convert any error into a failed [`ToolResult`]
//!
//! Each path emits exactly one outcome log line tagged with the tool name.
//! Nothing here retries; tools opt into [`retry::with_retry`] for their
//! upstream calls, inside the timeout window.

pub mod batch;
pub mod retry;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sleuth_domain::{ToolConfig, ToolError, ToolResult};
use std::time::Instant;
use tracing::{Instrument, debug, error, info, warn};

use crate::context::ToolContext;
use crate::tool::Tool;

/// Tool-specific behavior run inside the lifecycle.
#[async_trait]
pub trait ToolLogic: Send + Sync {
    type Input: DeserializeOwned + Send;
    type Output: Serialize + Send;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    /// Lifecycle configuration the tool starts with.
    fn default_config(&self) -> ToolConfig {
        ToolConfig::default()
    }

    fn input_schema(&self) -> Value;

    /// Checks beyond what deserialization enforces.
    fn validate(&self, input: &Self::Input) -> bool;

    async fn run(
        &self,
        input: Self::Input,
        ctx: &ToolContext,
        config: &ToolConfig,
    ) -> Result<ToolResult<Self::Output>, ToolError>;
}

/// A [`ToolLogic`] wrapped in the execution lifecycle.
pub struct ManagedTool<L> {
    logic: L,
    config: ToolConfig,
}

impl<L: ToolLogic> ManagedTool<L> {
    pub fn new(logic: L) -> Self {
        let config = logic.default_config();
        Self { logic, config }
    }

    pub fn with_config(logic: L, config: ToolConfig) -> Self {
        Self { logic, config }
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    fn parse_input(&self, input: Value) -> Result<L::Input, ToolError> {
        let typed: L::Input = serde_json::from_value(input).map_err(|_| ToolError::InvalidInput)?;
        if self.logic.validate(&typed) {
            Ok(typed)
        } else {
            Err(ToolError::InvalidInput)
        }
    }

    async fn run_checked(&self, input: Value, ctx: &ToolContext) -> Result<ToolResult<Value>, ToolError> {
        let typed = self.parse_input(input)?;

        if !self.config.enabled {
            return Err(ToolError::Disabled);
        }

        let timeout = ctx.timeout_or(self.config.timeout());
        let result = tokio::time::timeout(timeout, self.logic.run(typed, ctx, &self.config))
            .await
            .map_err(|_| ToolError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            })??;

        let ToolResult {
            success,
            data,
            error,
            metadata,
        } = result;
        let data = data
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ToolError::Execution(format!("failed to serialize output: {e}")))?;

        Ok(ToolResult {
            success,
            data,
            error,
            metadata,
        })
    }
}

#[async_trait]
impl<L: ToolLogic> Tool for ManagedTool<L> {
    fn name(&self) -> &str {
        self.logic.name()
    }

    fn description(&self) -> &str {
        self.logic.description()
    }

    fn version(&self) -> &str {
        self.logic.version()
    }

    fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ToolConfig {
        &mut self.config
    }

    async fn validate_input(&self, input: &Value) -> bool {
        self.parse_input(input.clone()).is_ok()
    }

    fn input_schema(&self) -> Value {
        self.logic.input_schema()
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult<Value> {
        let tool = self.logic.name();
        let start = Instant::now();

        async {
            debug!(tool, "Executing tool");

            let outcome = self.run_checked(input, ctx).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(result) => {
                    info!(tool, duration_ms, "Tool execution completed");
                    result.with_duration(duration_ms)
                }
                Err(err) => {
                    match err {
                        ToolError::InvalidInput | ToolError::Disabled => {
                            warn!(tool, duration_ms, code = err.code(), "Tool execution rejected: {}", err)
                        }
                        _ => error!(tool, duration_ms, code = err.code(), "Tool execution failed: {}", err),
                    }
                    ToolResult::failure(&err).with_duration(duration_ms)
                }
            }
        }
        .instrument(ctx.span.clone())
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Deserialize)]
    struct EchoInput {
        text: String,
        #[serde(default)]
        delay_ms: u64,
        #[serde(default)]
        fail: bool,
    }

    #[derive(Serialize)]
    struct EchoOutput {
        echoed: String,
    }

    #[derive(Default)]
    struct Echo {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl ToolLogic for Echo {
        type Input = EchoInput;
        type Output = EchoOutput;

        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes its input"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}, "required": ["text"]})
        }

        fn validate(&self, input: &EchoInput) -> bool {
            !input.text.is_empty()
        }

        async fn run(
            &self,
            input: EchoInput,
            _ctx: &ToolContext,
            _config: &ToolConfig,
        ) -> Result<ToolResult<EchoOutput>, ToolError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if input.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(input.delay_ms)).await;
            }
            if input.fail {
                return Err(ToolError::Upstream("provider unavailable".into()));
            }
            Ok(ToolResult::success(EchoOutput { echoed: input.text }).with_source("echo"))
        }
    }

    fn runs(tool: &ManagedTool<Echo>) -> usize {
        tool.logic().runs.load(Ordering::SeqCst)
    }

    #[tokio::test]
    async fn test_success_stamps_duration() {
        let tool = ManagedTool::new(Echo::default());
        let result = tool.execute(json!({"text": "hi"}), &ToolContext::new()).await;

        assert!(result.is_success());
        assert_eq!(result.data(), Some(&json!({"echoed": "hi"})));
        assert!(result.metadata.duration_ms.is_some());
        assert_eq!(result.metadata.source.as_deref(), Some("echo"));
    }

    #[tokio::test]
    async fn test_invalid_input_skips_logic() {
        let tool = ManagedTool::new(Echo::default());

        for input in [json!({"text": ""}), json!({"other": 1}), json!("text"), json!(null)] {
            let result = tool.execute(input, &ToolContext::new()).await;
            assert!(!result.is_success());
            assert_eq!(result.error(), Some("Invalid input provided"));
            assert!(result.data().is_none());
        }
        assert_eq!(runs(&tool), 0);
    }

    #[tokio::test]
    async fn test_disabled_tool_skips_logic() {
        let tool = ManagedTool::with_config(Echo::default(), ToolConfig::default().with_enabled(false));
        let result = tool.execute(json!({"text": "hi"}), &ToolContext::new()).await;

        assert_eq!(result.error(), Some("Tool is disabled"));
        assert_eq!(result.metadata.error_code.as_deref(), Some("DISABLED"));
        assert_eq!(runs(&tool), 0);
    }

    #[tokio::test]
    async fn test_context_timeout_overrides_config() {
        let tool = ManagedTool::new(Echo::default());
        let ctx = ToolContext::new().with_timeout(Duration::from_millis(20));
        let result = tool.execute(json!({"text": "slow", "delay_ms": 500}), &ctx).await;

        assert!(!result.is_success());
        assert!(result.is_timeout());
        assert!(result.data().is_none());
        assert!(result.metadata.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_config_timeout_applies() {
        let tool = ManagedTool::with_config(Echo::default(), ToolConfig::default().with_timeout_ms(20));
        let result = tool
            .execute(json!({"text": "slow", "delay_ms": 500}), &ToolContext::new())
            .await;

        assert!(result.is_timeout());
    }

    #[tokio::test]
    async fn test_logic_error_becomes_failed_result() {
        let tool = ManagedTool::new(Echo::default());
        let result = tool
            .execute(json!({"text": "x", "fail": true}), &ToolContext::new())
            .await;

        assert!(!result.is_success());
        assert_eq!(result.error(), Some("Upstream request failed: provider unavailable"));
        assert_eq!(result.metadata.error_code.as_deref(), Some("UPSTREAM"));
        assert!(!result.is_timeout());
    }

    #[tokio::test]
    async fn test_validate_input_and_schema() {
        let mut tool = ManagedTool::new(Echo::default());
        assert!(tool.validate_input(&json!({"text": "ok"})).await);
        assert!(!tool.validate_input(&json!({"text": ""})).await);

        let schema = tool.schema();
        assert_eq!(schema.name, "echo");
        assert_eq!(schema.input_schema["required"], json!(["text"]));

        tool.config_mut().enabled = false;
        assert!(!tool.config().enabled);
        assert_eq!(tool.version(), "1.0.0");
    }
}
