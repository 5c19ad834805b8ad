//! Page fetch payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allowed range for the per-call HTTP timeout, in milliseconds.
pub const FETCH_TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 1_000..=120_000;

/// Best-effort bag of `<meta>`/OpenGraph/Twitter values keyed by tag name.
pub type PageMetadata = BTreeMap<String, String>;

/// Input payload of the `web_fetch` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchInput {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_content: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
    /// HTTP timeout for this call in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl FetchInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extract_content: None,
            include_metadata: None,
            timeout: None,
        }
    }

    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = Some(true);
        self
    }

    pub fn raw(mut self) -> Self {
        self.extract_content = Some(false);
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn extract_content(&self) -> bool {
        self.extract_content.unwrap_or(true)
    }

    pub fn include_metadata(&self) -> bool {
        self.include_metadata.unwrap_or(false)
    }

    /// Checks everything except URL syntax, which the fetch tool owns.
    pub fn has_valid_timeout(&self) -> bool {
        self.timeout
            .is_none_or(|ms| FETCH_TIMEOUT_RANGE_MS.contains(&ms))
    }
}

/// A fetched (and possibly extracted) page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedContent {
    /// URL as requested (the cache key)
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub content_type: String,
    /// Length of `content` in characters
    pub content_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
    /// True when served from the fetch cache
    pub cached: bool,
    pub fetched_at: DateTime<Utc>,
}

impl FetchedContent {
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }
}

pub fn is_html_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("text/html") || lower.contains("application/xhtml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_input_defaults() {
        let input: FetchInput =
            serde_json::from_value(serde_json::json!({"url": "https://example.com"})).unwrap();
        assert!(input.extract_content());
        assert!(!input.include_metadata());
        assert!(input.has_valid_timeout());
    }

    #[test]
    fn test_fetch_timeout_bounds() {
        let base = FetchInput::new("https://example.com");
        assert!(base.clone().with_timeout(1_000).has_valid_timeout());
        assert!(base.clone().with_timeout(120_000).has_valid_timeout());
        assert!(!base.clone().with_timeout(999).has_valid_timeout());
        assert!(!base.with_timeout(120_001).has_valid_timeout());
    }

    #[test]
    fn test_html_content_type_detection() {
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(!is_html_content_type("application/json"));
        assert!(!is_html_content_type("text/plain"));
    }
}
