//! `web_fetch` tool: download a page and extract its readable content.
//!
//! Successful fetches are cached by requested URL ([`ContentCache`]); a
//! cache hit answers without touching the network and is marked
//! `cached: true`. HTML is reduced to its main text unless the caller sets
//! `extractContent: false`; other content types are returned verbatim.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `url` | string | Yes | Absolute http(s) URL |
//! | `extractContent` | boolean | No | Reduce HTML to readable text (default: true) |
//! | `includeMetadata` | boolean | No | Collect meta/OpenGraph tags (default: false) |
//! | `timeout` | integer | No | HTTP timeout in ms, 1000 to 120000 |

pub mod cache;
pub mod extract;
pub mod metadata;

pub use cache::ContentCache;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sleuth_application::{HttpFetcher, RetryPolicy, ToolContext, ToolLogic, with_retry};
use sleuth_domain::research::{FetchInput, FetchedContent, is_html_content_type};
use sleuth_domain::tool::config::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};
use sleuth_domain::{ToolConfig, ToolError, ToolResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Canonical tool name for the web fetch tool.
pub const WEB_FETCH: &str = "web_fetch";

/// `[tools.fetch]` configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
    /// HTTP timeout when the call does not set `timeout`
    pub request_timeout_ms: u64,
    pub retry_base_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            cache_ttl_secs: cache::DEFAULT_CACHE_TTL.as_secs(),
            cache_capacity: cache::DEFAULT_CACHE_CAPACITY,
            request_timeout_ms: 30_000,
            retry_base_delay_ms: 1000,
        }
    }
}

impl FetchConfig {
    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            enabled: self.enabled,
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
        }
    }

    pub fn build_cache(&self) -> ContentCache {
        ContentCache::new(self.cache_capacity, Duration::from_secs(self.cache_ttl_secs))
    }
}

fn is_fetchable_url(url: &str) -> bool {
    reqwest::Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

pub struct FetchTool {
    fetcher: Arc<dyn HttpFetcher>,
    cache: Arc<ContentCache>,
    config: FetchConfig,
}

impl FetchTool {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: FetchConfig) -> Self {
        let cache = Arc::new(config.build_cache());
        Self::with_cache(fetcher, cache, config)
    }

    /// Share `cache` with other holders, e.g. to inspect or clear it.
    pub fn with_cache(
        fetcher: Arc<dyn HttpFetcher>,
        cache: Arc<ContentCache>,
        config: FetchConfig,
    ) -> Self {
        Self {
            fetcher,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }
}

#[async_trait]
impl ToolLogic for FetchTool {
    type Input = FetchInput;
    type Output = FetchedContent;

    fn name(&self) -> &'static str {
        WEB_FETCH
    }

    fn description(&self) -> &'static str {
        "Fetch a web page and extract its main readable content, optionally with \
         page metadata (author, publication date, OpenGraph tags)."
    }

    fn default_config(&self) -> ToolConfig {
        self.config.tool_config()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "format": "uri",
                    "description": "The URL to fetch"
                },
                "extractContent": {
                    "type": "boolean",
                    "description": "Extract the main readable text from HTML",
                    "default": true
                },
                "includeMetadata": {
                    "type": "boolean",
                    "description": "Include meta, OpenGraph and Twitter tags",
                    "default": false
                },
                "timeout": {
                    "type": "integer",
                    "description": "HTTP timeout in milliseconds",
                    "minimum": 1000,
                    "maximum": 120000,
                    "default": self.config.request_timeout_ms
                }
            },
            "required": ["url"]
        })
    }

    fn validate(&self, input: &FetchInput) -> bool {
        is_fetchable_url(&input.url) && input.has_valid_timeout()
    }

    async fn run(
        &self,
        input: FetchInput,
        ctx: &ToolContext,
        config: &ToolConfig,
    ) -> Result<ToolResult<FetchedContent>, ToolError> {
        if let Some(mut hit) = self.cache.get(&input.url) {
            debug!(url = %input.url, "Serving page from cache");
            hit.cached = true;
            let source = hit.final_url.clone();
            return Ok(ToolResult::success(hit).with_source(source));
        }

        let timeout = Duration::from_millis(input.timeout.unwrap_or(self.config.request_timeout_ms));
        let policy = RetryPolicy::new(
            ctx.max_retries_or(config.max_retries),
            Duration::from_millis(self.config.retry_base_delay_ms),
        );
        let response = with_retry(policy, || self.fetcher.get(&input.url, timeout)).await?;

        let is_html = is_html_content_type(&response.content_type);
        let (title, content) = if is_html && input.extract_content() {
            let article = extract::extract_article(&response.body).map_err(|e| match e {
                ToolError::Extraction(reason) => {
                    ToolError::Extraction(format!("{}: {reason}", input.url))
                }
                other => other,
            })?;
            (article.title, article.content)
        } else {
            (None, response.body.clone())
        };

        let mut page = FetchedContent {
            url: input.url.clone(),
            final_url: response.final_url.clone(),
            title,
            content_length: content.chars().count(),
            content,
            content_type: response.content_type.clone(),
            author: None,
            published_date: None,
            metadata: None,
            cached: false,
            fetched_at: Utc::now(),
        };

        if input.include_metadata() && is_html {
            let metadata = metadata::extract_metadata(&response.body);
            page.author = metadata::author(&metadata);
            page.published_date = metadata::published_date(&metadata);
            page.metadata = Some(metadata);
        }

        debug!(
            url = %page.url,
            final_url = %page.final_url,
            status = response.status,
            content_length = page.content_length,
            "Page fetched"
        );

        self.cache.insert(input.url, page.clone());
        let source = page.final_url.clone();
        Ok(ToolResult::success(page).with_source(source))
    }
}
