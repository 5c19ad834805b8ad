//! Anthropic Messages API adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sleuth_application::{
    ChatRole, CompletionClient, CompletionRequest, CompletionResponse, GatewayError, TokenUsage,
};
use tracing::debug;

use super::{build_client, ensure_success, transport_error};
use crate::config::{FileAnthropicConfig, FileHttpConfig};

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

/// Completion client speaking the Anthropic Messages API.
pub struct AnthropicCompletionClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    api_version: String,
}

impl AnthropicCompletionClient {
    /// Fails with [`GatewayError::Configuration`] when no API key resolves.
    pub fn new(config: &FileAnthropicConfig, http: &FileHttpConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::Configuration(format!(
                "no Anthropic API key: set {} or providers.anthropic.api_key",
                config.api_key_env
            ))
        })?;

        Ok(Self {
            client: build_client(http)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

/// System messages become the top-level `system` field; the rest keep order.
fn to_wire(request: &CompletionRequest) -> MessagesRequest<'_> {
    let mut system = Vec::new();
    let mut messages = Vec::new();

    for message in &request.messages {
        match message.role {
            ChatRole::System => system.push(message.content.as_str()),
            ChatRole::User => messages.push(WireMessage {
                role: "user",
                content: &message.content,
            }),
            ChatRole::Assistant => messages.push(WireMessage {
                role: "assistant",
                content: &message.content,
            }),
        }
    }

    MessagesRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system: (!system.is_empty()).then(|| system.join("\n\n")),
        messages,
    }
}

fn from_wire(response: MessagesResponse) -> CompletionResponse {
    let usage = response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
        input_tokens: u.input_tokens,
        output_tokens: u.output_tokens,
    });

    CompletionResponse {
        content: response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect(),
        usage,
        model: response.model,
    }
}

#[async_trait]
impl CompletionClient for AnthropicCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, GatewayError> {
        let body = to_wire(&request);
        debug!(
            model = body.model,
            messages = body.messages.len(),
            max_tokens = body.max_tokens,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let response = ensure_success(response).await?;

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(from_wire(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sleuth_application::ChatMessage;

    #[test]
    fn test_system_messages_lifted() {
        let request = CompletionRequest::new(
            "claude-test",
            vec![
                ChatMessage::system("You are precise."),
                ChatMessage::user("Summarize this."),
                ChatMessage::system("Answer in English."),
            ],
        )
        .with_max_tokens(500)
        .with_temperature(0.3);

        let wire = serde_json::to_value(to_wire(&request)).unwrap();
        assert_eq!(wire["system"], "You are precise.\n\nAnswer in English.");
        assert_eq!(wire["messages"], json!([{"role": "user", "content": "Summarize this."}]));
        assert_eq!(wire["max_tokens"], 500);
        assert_eq!(wire["model"], "claude-test");
    }

    #[test]
    fn test_no_system_field_without_system_messages() {
        let request = CompletionRequest::new("m", vec![ChatMessage::user("hi")]);
        let wire = serde_json::to_value(to_wire(&request)).unwrap();
        assert!(wire.get("system").is_none());
    }

    #[test]
    fn test_response_keeps_text_blocks() {
        let raw = json!({
            "model": "claude-test",
            "content": [
                {"type": "text", "text": "first "},
                {"type": "tool_use", "id": "x", "name": "n", "input": {}},
                {"type": "text", "text": "second"}
            ],
            "usage": {"input_tokens": 12, "output_tokens": 30}
        });
        let response = from_wire(serde_json::from_value(raw).unwrap());

        assert_eq!(response.text(), "first second");
        assert_eq!(response.usage.total(), 42);
        assert_eq!(response.model.as_deref(), Some("claude-test"));
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let config = FileAnthropicConfig {
            api_key: None,
            api_key_env: "SLEUTH_TEST_UNSET_ANTHROPIC_KEY".into(),
            ..Default::default()
        };
        let err = AnthropicCompletionClient::new(&config, &FileHttpConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let config = FileAnthropicConfig {
            api_key: Some("sk-test".into()),
            base_url: "http://localhost:9000/".into(),
            ..Default::default()
        };
        let client = AnthropicCompletionClient::new(&config, &FileHttpConfig::default()).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/v1/messages");
    }
}
