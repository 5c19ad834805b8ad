//! Per-call execution context.

use std::time::Duration;
use tracing::Span;

/// Context for one tool execution.
///
/// Carries the logging sink (a [`tracing::Span`] every lifecycle log line is
/// emitted under), optional caller identifiers and per-call overrides of the
/// tool's timeout and retry budget. Lives for a single `execute` call.
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub span: Span,
    pub session_id: Option<String>,
    pub user_id: Option<String>,
    /// Overrides the tool's configured timeout
    pub timeout: Option<Duration>,
    /// Overrides the tool's configured retry budget
    pub max_retries: Option<u32>,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolContext {
    pub fn new() -> Self {
        Self {
            span: Span::none(),
            session_id: None,
            user_id: None,
            timeout: None,
            max_retries: None,
        }
    }

    /// Context for a session, with a `tool_call` span carrying the ids.
    pub fn for_session(session_id: impl Into<String>, user_id: Option<String>) -> Self {
        let session_id = session_id.into();
        let span = tracing::info_span!(
            "tool_call",
            session_id = %session_id,
            user_id = user_id.as_deref().unwrap_or("-"),
        );
        Self {
            span,
            session_id: Some(session_id),
            user_id,
            ..Self::new()
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Per-call timeout, else `configured`.
    pub fn timeout_or(&self, configured: Duration) -> Duration {
        self.timeout.unwrap_or(configured)
    }

    /// Per-call retry budget, else `configured`.
    pub fn max_retries_or(&self, configured: u32) -> u32 {
        self.max_retries.unwrap_or(configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let ctx = ToolContext::new()
            .with_timeout(Duration::from_millis(250))
            .with_max_retries(0);
        assert_eq!(ctx.timeout_or(Duration::from_secs(30)), Duration::from_millis(250));
        assert_eq!(ctx.max_retries_or(3), 0);
    }

    #[test]
    fn test_defaults_fall_through() {
        let ctx = ToolContext::for_session("s-1", None);
        assert_eq!(ctx.session_id.as_deref(), Some("s-1"));
        assert_eq!(ctx.timeout_or(Duration::from_secs(30)), Duration::from_secs(30));
        assert_eq!(ctx.max_retries_or(2), 2);
    }
}
