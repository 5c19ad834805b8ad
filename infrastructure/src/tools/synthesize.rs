//! `synthesize_sources` tool: merge several sources into one cited answer.
//!
//! Sources are numbered in input order and referenced as `[n]` in the
//! prompt and the answer. The answer's shape depends on `outputFormat`;
//! report and structured answers are parsed into sections (JSON first,
//! `##` markdown second). Citations and the confidence score never depend
//! on the model's answer.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `sources` | object[] | Yes | `{content, url?, title?, metadata?}`, at least one |
//! | `synthesisGoal` | string | Yes | What the synthesis should answer |
//! | `outputFormat` | string | No | `summary` (default), `report`, `bullets`, `structured` |
//! | `maxLength` | integer | No | Word budget, 100 to 10000 |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sleuth_application::{
    ChatMessage, CompletionClient, CompletionRequest, RetryPolicy, ToolContext, ToolLogic,
    with_retry,
};
use sleuth_domain::parsing::synthesis::{extract_bullets, parse_structured};
use sleuth_domain::research::{
    Citation, OutputFormat, SynthesisOutput, SynthesizeInput,
    synthesis::confidence_score,
};
use sleuth_domain::{LlmSettings, ToolConfig, ToolError, ToolResult};
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::analyze::truncate_chars;

/// Canonical tool name for the synthesis tool.
pub const SYNTHESIZE_SOURCES: &str = "synthesize_sources";

const SYSTEM_PROMPT: &str = "You are a research synthesist. Combine the numbered sources \
    into one accurate answer. Cross-reference the sources, point out where they agree and \
    where they contradict each other, and cite every claim with its source number in \
    square brackets, e.g. [1] or [2][3]. Never cite a source that was not provided.";

/// `[tools.synthesize]` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizeConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Each source's content is cut to this many characters
    pub source_chars: usize,
    pub retry_base_delay_ms: u64,
}

impl Default for SynthesizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 90_000,
            max_retries: 2,
            model: LlmSettings::default().model,
            temperature: 0.5,
            max_tokens: 4000,
            source_chars: 3000,
            retry_base_delay_ms: 1000,
        }
    }
}

impl SynthesizeConfig {
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

fn format_instructions(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Summary => {
            "Write a cohesive summary in flowing prose paragraphs that directly addresses \
             the goal."
        }
        OutputFormat::Report => {
            "Write a structured report in markdown. Use `##` headings for sections \
             (for example Overview, Analysis, Contradictions, Conclusion) and include a \
             `## Key Findings` section listing the most important findings as `- ` bullets."
        }
        OutputFormat::Bullets => {
            "Write the synthesis as a bulleted list. Put each finding on its own line \
             starting with `- ` and keep every bullet to one or two sentences."
        }
        OutputFormat::Structured => {
            "Respond with JSON only, in exactly this shape: \
             {\"sections\": [{\"heading\": string, \"content\": string, \"sources\": [number]}], \
             \"keyFindings\": [string]}"
        }
    }
}

/// Prompt body: goal, numbered sources, then the format directives.
fn build_prompt(input: &SynthesizeInput, source_chars: usize) -> String {
    let mut prompt = format!("Synthesis goal: {}\n\nSources:\n", input.synthesis_goal.trim());

    for (index, source) in input.sources.iter().enumerate() {
        let _ = write!(prompt, "\n[{}] {}", index + 1, source.title.as_deref().unwrap_or("Untitled"));
        if let Some(url) = &source.url {
            let _ = write!(prompt, "\nURL: {url}");
        }
        let _ = writeln!(prompt, "\n{}", truncate_chars(source.content.trim(), source_chars));
    }

    let _ = write!(prompt, "\n{}", format_instructions(input.output_format()));
    if let Some(words) = input.max_length {
        let _ = write!(prompt, "\nKeep the answer under {words} words.");
    }
    prompt
}

pub struct SynthesizeTool {
    client: Arc<dyn CompletionClient>,
    config: SynthesizeConfig,
}

impl SynthesizeTool {
    pub fn new(client: Arc<dyn CompletionClient>, config: SynthesizeConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ToolLogic for SynthesizeTool {
    type Input = SynthesizeInput;
    type Output = SynthesisOutput;

    fn name(&self) -> &'static str {
        SYNTHESIZE_SOURCES
    }

    fn description(&self) -> &'static str {
        "Synthesize multiple sources into a single cited summary, report, bullet list \
         or structured result, highlighting agreements and contradictions."
    }

    fn default_config(&self) -> ToolConfig {
        self.config.tool_config()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sources": {
                    "type": "array",
                    "minItems": 1,
                    "description": "Sources to synthesize, cited by position as [1], [2], ...",
                    "items": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string", "minLength": 1 },
                            "url": { "type": "string" },
                            "title": { "type": "string" },
                            "metadata": {
                                "type": "object",
                                "description": "Free-form; a credibility score above 0.8 raises confidence"
                            }
                        },
                        "required": ["content"]
                    }
                },
                "synthesisGoal": {
                    "type": "string",
                    "minLength": 1,
                    "description": "The question or goal the synthesis should address"
                },
                "outputFormat": {
                    "type": "string",
                    "enum": ["summary", "report", "bullets", "structured"],
                    "default": "summary"
                },
                "maxLength": {
                    "type": "integer",
                    "minimum": 100,
                    "maximum": 10000,
                    "description": "Approximate maximum length in words"
                }
            },
            "required": ["sources", "synthesisGoal"]
        })
    }

    fn validate(&self, input: &SynthesizeInput) -> bool {
        input.is_valid()
    }

    async fn run(
        &self,
        input: SynthesizeInput,
        ctx: &ToolContext,
        config: &ToolConfig,
    ) -> Result<ToolResult<SynthesisOutput>, ToolError> {
        let source_count = input.sources.len();
        if source_count < 2 {
            warn!(
                source_count,
                "Synthesizing fewer than two sources, cross-referencing is limited"
            );
        }

        let format = input.output_format();
        let llm = self.config.llm_settings();
        let request = CompletionRequest::new(
            llm.model,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(&input, self.config.source_chars)),
            ],
        )
        .with_max_tokens(llm.max_tokens)
        .with_temperature(llm.temperature);

        let policy = RetryPolicy::new(
            ctx.max_retries_or(config.max_retries),
            Duration::from_millis(self.config.retry_base_delay_ms),
        );
        let response = with_retry(policy, || self.client.complete(request.clone())).await?;
        let synthesis = response.text().trim().to_string();

        let (sections, key_findings) = match format {
            OutputFormat::Report | OutputFormat::Structured => {
                let parsed = parse_structured(&synthesis);
                if parsed.is_fallback() {
                    debug!(format = ?format, "Synthesis was not JSON, parsed as markdown");
                }
                let parsed = parsed.into_inner();
                (parsed.sections, parsed.key_findings)
            }
            OutputFormat::Bullets => (Vec::new(), extract_bullets(&synthesis)),
            OutputFormat::Summary => (Vec::new(), Vec::new()),
        };

        let output = SynthesisOutput {
            synthesis,
            sections,
            key_findings,
            citations: Citation::for_sources(&input.sources),
            confidence: confidence_score(&input.sources),
            output_format: format,
            source_count,
        };

        debug!(
            source_count,
            sections = output.sections.len(),
            key_findings = output.key_findings.len(),
            confidence = output.confidence,
            "Synthesis completed"
        );

        Ok(ToolResult::success(output)
            .with_tokens_used(response.usage.total())
            .with_source(self.config.model.clone()))
    }
}
