//! Page metadata from `<meta>` tags, OpenGraph and Twitter cards.
//!
//! Best effort: a failure here never fails the fetch, it only leaves the
//! metadata empty.

use scraper::Html;
use sleuth_domain::ToolError;
use sleuth_domain::research::PageMetadata;
use tracing::debug;

use super::extract::selector;

/// Plain `name=` keys worth keeping; prefixed families are kept whole.
const NAMED_KEYS: &[&str] = &[
    "description",
    "keywords",
    "author",
    "date",
    "datepublished",
    "publish_date",
    "pubdate",
];

const PREFIXES: &[&str] = &["og:", "twitter:", "article:"];

const AUTHOR_KEYS: &[&str] = &["author", "article:author", "twitter:creator"];

const PUBLISHED_KEYS: &[&str] = &[
    "article:published_time",
    "datepublished",
    "publish_date",
    "pubdate",
    "date",
];

fn is_wanted(key: &str) -> bool {
    NAMED_KEYS.contains(&key) || PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Metadata of `html`, keyed by lowercased tag name.
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);
    collect(&document).unwrap_or_else(|e| {
        debug!(error = %e, "Metadata extraction failed");
        PageMetadata::new()
    })
}

fn collect(document: &Html) -> Result<PageMetadata, ToolError> {
    let mut metadata = PageMetadata::new();

    let meta = selector("meta[content]")?;
    for el in document.select(&meta) {
        let el = el.value();
        let Some(key) = el
            .attr("property")
            .or_else(|| el.attr("name"))
            .or_else(|| el.attr("itemprop"))
        else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let content = el.attr("content").unwrap_or_default().trim();
        if content.is_empty() || !is_wanted(&key) {
            continue;
        }
        metadata.entry(key).or_insert_with(|| content.to_string());
    }

    let canonical = selector("link[rel=\"canonical\"][href]")?;
    if let Some(href) = document
        .select(&canonical)
        .find_map(|el| el.value().attr("href"))
    {
        metadata.insert("canonical".into(), href.trim().to_string());
    }

    let lang = selector("html[lang]")?;
    if let Some(lang) = document.select(&lang).find_map(|el| el.value().attr("lang")) {
        metadata.insert("language".into(), lang.trim().to_string());
    }

    Ok(metadata)
}

fn first_of(metadata: &PageMetadata, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| metadata.get(*key).cloned())
}

pub fn author(metadata: &PageMetadata) -> Option<String> {
    first_of(metadata, AUTHOR_KEYS)
}

pub fn published_date(metadata: &PageMetadata) -> Option<String> {
    first_of(metadata, PUBLISHED_KEYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="description" content="Ten years of Rust">
  <meta name="viewport" content="width=device-width">
  <meta property="og:title" content="Rust turns ten">
  <meta property="og:type" content="article">
  <meta name="twitter:creator" content="@rustlang">
  <meta property="article:published_time" content="2025-05-15T09:00:00Z">
  <meta name="Author" content="The Rust Team">
  <meta name="keywords" content="">
  <link rel="canonical" href="https://blog.rust-lang.org/2025/05/15/ten-years/">
</head>
<body><p>Hello</p></body>
</html>"#;

    #[test]
    fn test_collects_known_tags() {
        let metadata = extract_metadata(PAGE);
        assert_eq!(metadata.get("description").map(String::as_str), Some("Ten years of Rust"));
        assert_eq!(metadata.get("og:type").map(String::as_str), Some("article"));
        assert_eq!(metadata.get("language").map(String::as_str), Some("en"));
        assert_eq!(
            metadata.get("canonical").map(String::as_str),
            Some("https://blog.rust-lang.org/2025/05/15/ten-years/")
        );
        assert!(!metadata.contains_key("viewport"));
        assert!(!metadata.contains_key("keywords"));
    }

    #[test]
    fn test_promoted_fields() {
        let metadata = extract_metadata(PAGE);
        assert_eq!(author(&metadata).as_deref(), Some("The Rust Team"));
        assert_eq!(published_date(&metadata).as_deref(), Some("2025-05-15T09:00:00Z"));
    }

    #[test]
    fn test_plain_text_has_no_metadata() {
        let metadata = extract_metadata("just some text, not html");
        assert!(metadata.is_empty());
        assert!(author(&metadata).is_none());
    }
}
