//! `analyze_content` tool: LLM-backed extraction, summary, classification
//! and sentiment over a block of text.
//!
//! The content is truncated to `prompt_chars` before prompting. Targeted
//! extractions (facts, entities, key phrases, concepts) are independent
//! prompts and are issued concurrently; the summary, classification and
//! sentiment prompts follow. Malformed completions degrade to the defaults
//! in [`sleuth_domain::parsing`]; transport failures propagate.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `content` | string | Yes | Text to analyze, at most 100000 characters |
//! | `analysisType` | string | No | `extract`, `summarize`, `classify`, `sentiment` or `all` (default) |
//! | `extractionTargets` | string[] | No | Subset of `facts`, `entities`, `keyPhrases`, `concepts` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sleuth_application::{
    ChatMessage, CompletionClient, CompletionRequest, RetryPolicy, ToolContext, ToolLogic,
    with_retry,
};
use sleuth_domain::parsing::{Parsed, analysis};
use sleuth_domain::research::{
    AnalysisOutput, AnalyzeInput, ExtractionTarget, analysis::MAX_ANALYSIS_CHARS,
};
use sleuth_domain::{LlmSettings, ToolConfig, ToolError, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Canonical tool name for the analysis tool.
pub const ANALYZE_CONTENT: &str = "analyze_content";

const SYSTEM_PROMPT: &str = "You are a meticulous research analyst. Work only from the \
    provided content and never invent information. When asked for JSON, respond with \
    valid JSON only, without commentary.";

/// `[tools.analyze]` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Content is cut to this many characters before prompting
    pub prompt_chars: usize,
    pub retry_base_delay_ms: u64,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        let llm = LlmSettings::default();
        Self {
            enabled: true,
            timeout_ms: 60_000,
            max_retries: 2,
            model: llm.model,
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            prompt_chars: 8000,
            retry_base_delay_ms: 1000,
        }
    }
}

impl AnalyzeConfig {
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            enabled: self.enabled,
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
        }
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// First `max_chars` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn settle<T>(task: &str, parsed: Parsed<T>) -> T {
    if parsed.is_fallback() {
        debug!(task, "Response not in the expected shape, using fallback");
    }
    parsed.into_inner()
}

fn facts_prompt(content: &str) -> String {
    format!(
        "Extract the verifiable factual claims from the content below.\n\
         Respond with a JSON array of objects: \
         [{{\"statement\": string, \"confidence\": number between 0 and 1}}].\n\n\
         Content:\n{content}"
    )
}

fn entities_prompt(content: &str) -> String {
    format!(
        "Identify the named entities in the content below.\n\
         Respond with a JSON array of objects: [{{\"text\": string, \"type\": one of \
         person, organization, location, date, product, technology, event, concept, other, \
         \"confidence\": number between 0 and 1}}].\n\n\
         Content:\n{content}"
    )
}

fn key_phrases_prompt(content: &str) -> String {
    format!(
        "List the most important key phrases of the content below, at most 15.\n\
         Respond with a JSON array of strings.\n\n\
         Content:\n{content}"
    )
}

fn concepts_prompt(content: &str) -> String {
    format!(
        "List the main concepts and themes discussed in the content below, at most 10.\n\
         Respond with a JSON array of strings.\n\n\
         Content:\n{content}"
    )
}

fn summary_prompt(content: &str) -> String {
    format!(
        "Summarize the content below in one or two concise paragraphs. \
         Keep the key facts and conclusions. Respond with the summary text only.\n\n\
         Content:\n{content}"
    )
}

fn classification_prompt(content: &str) -> String {
    format!(
        "Classify the content below into up to three topical categories \
         (for example technology, science, business, politics, health, news, opinion).\n\
         Respond with a JSON array of objects: \
         [{{\"category\": string, \"confidence\": number between 0 and 1}}].\n\n\
         Content:\n{content}"
    )
}

fn sentiment_prompt(content: &str) -> String {
    format!(
        "Assess the overall sentiment of the content below.\n\
         Respond with a JSON object: {{\"score\": number between -1 and 1, \
         \"label\": \"positive\" | \"negative\" | \"neutral\"}}.\n\n\
         Content:\n{content}"
    )
}

/// Raw answer of one sub-task.
struct Answer {
    text: String,
    tokens: u64,
}

pub struct AnalyzeTool {
    client: Arc<dyn CompletionClient>,
    config: AnalyzeConfig,
}

impl AnalyzeTool {
    pub fn new(client: Arc<dyn CompletionClient>, config: AnalyzeConfig) -> Self {
        Self { client, config }
    }

    async fn ask(&self, prompt: String, policy: RetryPolicy) -> Result<Answer, ToolError> {
        let llm = self.config.llm_settings();
        let request = CompletionRequest::new(
            llm.model,
            vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        )
        .with_max_tokens(llm.max_tokens)
        .with_temperature(llm.temperature);

        let response = with_retry(policy, || self.client.complete(request.clone())).await?;
        Ok(Answer {
            text: response.text(),
            tokens: response.usage.total(),
        })
    }

    async fn ask_if(
        &self,
        wanted: bool,
        prompt: impl FnOnce() -> String,
        policy: RetryPolicy,
    ) -> Result<Option<Answer>, ToolError> {
        if !wanted {
            return Ok(None);
        }
        self.ask(prompt(), policy).await.map(Some)
    }
}

#[async_trait]
impl ToolLogic for AnalyzeTool {
    type Input = AnalyzeInput;
    type Output = AnalysisOutput;

    fn name(&self) -> &'static str {
        ANALYZE_CONTENT
    }

    fn description(&self) -> &'static str {
        "Analyze text with an LLM: extract facts, entities, key phrases and concepts, \
         summarize, classify, and assess sentiment."
    }

    fn default_config(&self) -> ToolConfig {
        self.config.tool_config()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The text to analyze",
                    "minLength": 1,
                    "maxLength": MAX_ANALYSIS_CHARS
                },
                "analysisType": {
                    "type": "string",
                    "enum": ["extract", "summarize", "classify", "sentiment", "all"],
                    "description": "Which analysis to run",
                    "default": "all"
                },
                "extractionTargets": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": ["facts", "entities", "keyPhrases", "concepts"]
                    },
                    "description": "What to extract when extraction runs (default: all)"
                }
            },
            "required": ["content"]
        })
    }

    fn validate(&self, input: &AnalyzeInput) -> bool {
        input.is_valid()
    }

    async fn run(
        &self,
        input: AnalyzeInput,
        ctx: &ToolContext,
        config: &ToolConfig,
    ) -> Result<ToolResult<AnalysisOutput>, ToolError> {
        let content = truncate_chars(&input.content, self.config.prompt_chars);
        let analysis_type = input.analysis_type();
        let policy = RetryPolicy::new(
            ctx.max_retries_or(config.max_retries),
            Duration::from_millis(self.config.retry_base_delay_ms),
        );
        let extract = analysis_type.runs_extraction();

        let mut output = AnalysisOutput {
            analysis_type,
            ..Default::default()
        };
        let mut tokens_used = 0;

        let (facts, entities, key_phrases, concepts) = futures::join!(
            self.ask_if(
                extract && input.targets(ExtractionTarget::Facts),
                || facts_prompt(content),
                policy,
            ),
            self.ask_if(
                extract && input.targets(ExtractionTarget::Entities),
                || entities_prompt(content),
                policy,
            ),
            self.ask_if(
                extract && input.targets(ExtractionTarget::KeyPhrases),
                || key_phrases_prompt(content),
                policy,
            ),
            self.ask_if(
                extract && input.targets(ExtractionTarget::Concepts),
                || concepts_prompt(content),
                policy,
            ),
        );

        if let Some(answer) = facts? {
            tokens_used += answer.tokens;
            output.facts = settle("facts", analysis::parse_facts(&answer.text));
        }
        if let Some(answer) = entities? {
            tokens_used += answer.tokens;
            output.entities = settle("entities", analysis::parse_entities(&answer.text));
        }
        if let Some(answer) = key_phrases? {
            tokens_used += answer.tokens;
            output.key_phrases = settle(
                "key_phrases",
                analysis::parse_string_list(&answer.text, "keyPhrases"),
            );
        }
        if let Some(answer) = concepts? {
            tokens_used += answer.tokens;
            output.concepts = settle(
                "concepts",
                analysis::parse_string_list(&answer.text, "concepts"),
            );
        }

        if analysis_type.runs_summary() {
            let answer = self.ask(summary_prompt(content), policy).await?;
            tokens_used += answer.tokens;
            let summary = answer.text.trim();
            output.summary = (!summary.is_empty()).then(|| summary.to_string());
        }

        if analysis_type.runs_classification() {
            let answer = self.ask(classification_prompt(content), policy).await?;
            tokens_used += answer.tokens;
            output.classifications = settle(
                "classification",
                analysis::parse_classifications(&answer.text),
            );
        }

        if analysis_type.runs_sentiment() {
            let answer = self.ask(sentiment_prompt(content), policy).await?;
            tokens_used += answer.tokens;
            output.sentiment = Some(settle("sentiment", analysis::parse_sentiment(&answer.text)));
        }

        debug!(
            analysis_type = ?analysis_type,
            truncated = content.len() < input.content.len(),
            facts = output.facts.len(),
            entities = output.entities.len(),
            tokens_used,
            "Analysis completed"
        );

        Ok(ToolResult::success(output)
            .with_tokens_used(tokens_used)
            .with_source(self.config.model.clone()))
    }
}
