//! `web_search` tool: query an external search provider.
//!
//! The provider call is retried with exponential backoff. Results are
//! normalized to [`SearchHit`] (the domain is derived from the URL) and the
//! optional `dateRange` is applied client-side afterwards, since providers
//! do not filter by date themselves.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | The search query |
//! | `maxResults` | integer | No | 1 to 100 (default from config, 10) |
//! | `searchDepth` | string | No | `basic` or `advanced` |
//! | `includeDomains` | string[] | No | Restrict to these domains |
//! | `excludeDomains` | string[] | No | Skip these domains |
//! | `dateRange` | object | No | `{from?, to?}`, inclusive |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sleuth_application::{
    ProviderResult, RetryPolicy, SearchProvider, SearchQuery, ToolContext, ToolLogic, with_retry,
};
use sleuth_domain::research::{SearchDepth, SearchHit, SearchInput, SearchOutput};
use sleuth_domain::tool::config::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use sleuth_domain::{ToolConfig, ToolError, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Canonical tool name for the web search tool.
pub const WEB_SEARCH: &str = "web_search";

/// `[tools.search]` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_retries: u32,
    /// Used when the call does not set `maxResults`
    pub default_max_results: u32,
    /// Used when the call does not set `searchDepth`
    pub default_depth: SearchDepth,
    pub retry_base_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            default_max_results: 10,
            default_depth: SearchDepth::Basic,
            retry_base_delay_ms: 1000,
        }
    }
}

impl SearchConfig {
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            enabled: self.enabled,
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
        }
    }
}

/// Host of `url`, or an empty string when it does not parse.
pub fn domain_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn normalize(result: ProviderResult) -> SearchHit {
    SearchHit {
        domain: domain_of(&result.url),
        title: result.title,
        url: result.url,
        snippet: result.content,
        published_date: result.published_date,
        score: result.score,
    }
}

pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
    config: SearchConfig,
}

impl SearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, config: SearchConfig) -> Self {
        Self { provider, config }
    }
}

#[async_trait]
impl ToolLogic for SearchTool {
    type Input = SearchInput;
    type Output = SearchOutput;

    fn name(&self) -> &'static str {
        WEB_SEARCH
    }

    fn description(&self) -> &'static str {
        "Search the web for current information. Returns titles, URLs, snippets, \
         publication dates and relevance scores."
    }

    fn default_config(&self) -> ToolConfig {
        self.config.tool_config()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query",
                    "minLength": 1
                },
                "maxResults": {
                    "type": "integer",
                    "description": "Maximum number of results",
                    "minimum": 1,
                    "maximum": 100,
                    "default": self.config.default_max_results
                },
                "searchDepth": {
                    "type": "string",
                    "enum": ["basic", "advanced"],
                    "description": "Search depth; advanced is slower but more thorough",
                    "default": self.config.default_depth.as_str()
                },
                "includeDomains": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only return results from these domains"
                },
                "excludeDomains": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Never return results from these domains"
                },
                "dateRange": {
                    "type": "object",
                    "description": "Inclusive publication date window (YYYY-MM-DD or RFC 3339). Undated results are kept.",
                    "properties": {
                        "from": { "type": "string" },
                        "to": { "type": "string" }
                    }
                }
            },
            "required": ["query"]
        })
    }

    fn validate(&self, input: &SearchInput) -> bool {
        input.is_valid()
    }

    async fn run(
        &self,
        input: SearchInput,
        ctx: &ToolContext,
        config: &ToolConfig,
    ) -> Result<ToolResult<SearchOutput>, ToolError> {
        let max_results = input.max_results.unwrap_or(self.config.default_max_results);
        let query = SearchQuery {
            query: input.query.clone(),
            search_depth: input.search_depth.unwrap_or(self.config.default_depth),
            max_results,
            include_domains: input.include_domains.clone().unwrap_or_default(),
            exclude_domains: input.exclude_domains.clone().unwrap_or_default(),
        };

        let policy = RetryPolicy::new(
            ctx.max_retries_or(config.max_retries),
            Duration::from_millis(self.config.retry_base_delay_ms),
        );
        let raw = with_retry(policy, || self.provider.search(&query)).await?;
        let returned = raw.len();

        let results: Vec<SearchHit> = raw
            .into_iter()
            .map(normalize)
            .filter(|hit| {
                input
                    .date_range
                    .as_ref()
                    .is_none_or(|range| range.admits(hit.published_date.as_deref()))
            })
            .take(max_results as usize)
            .collect();

        debug!(
            query = %input.query,
            returned,
            kept = results.len(),
            "Search completed"
        );

        Ok(ToolResult::success(SearchOutput {
            query: input.query,
            total_results: results.len(),
            results,
        })
        .with_source(self.provider.name()))
    }
}
