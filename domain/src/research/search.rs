//! Web search payloads and the client-side date filter.
//!
//! The upstream search provider has no date filtering, so [`DateRange`] is
//! applied post-hoc to the normalized [`SearchHit`]s. A hit without a
//! (parseable) publication date is always kept: unknown is not excluded.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for `maxResults`.
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// How much effort the provider spends on a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a publication date as reported by providers.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` (assumed UTC) and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Inclusive publication-date window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    /// Every given bound parses, and `from <= to` when both are given.
    pub fn is_valid(&self) -> bool {
        let from = self.from.as_deref().map(parse_date);
        let to = self.to.as_deref().map(parse_date);
        match (from, to) {
            (Some(None), _) | (_, Some(None)) => false,
            (Some(Some(from)), Some(Some(to))) => from <= to,
            _ => true,
        }
    }

    /// Whether a hit published at `published` survives the filter.
    pub fn admits(&self, published: Option<&str>) -> bool {
        let Some(date) = published.and_then(parse_date) else {
            return true;
        };
        if let Some(from) = self.from.as_deref().and_then(parse_date)
            && date < from
        {
            return false;
        }
        if let Some(to) = self.to.as_deref().and_then(parse_date)
            && date > to
        {
            return false;
        }
        true
    }
}

/// Input payload of the `web_search` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_depth: Option<SearchDepth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl SearchInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: None,
            search_depth: None,
            include_domains: None,
            exclude_domains: None,
            date_range: None,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn is_valid(&self) -> bool {
        if self.query.trim().is_empty() {
            return false;
        }
        if let Some(n) = self.max_results
            && !(1..=MAX_SEARCH_RESULTS).contains(&n)
        {
            return false;
        }
        self.date_range.as_ref().is_none_or(DateRange::is_valid)
    }
}

/// A normalized search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Host of `url`, empty when the URL does not parse
    pub domain: String,
}

/// Output payload of the `web_search` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_results: usize,
}
