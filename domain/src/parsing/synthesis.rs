//! Parsers for synthesis responses.
//!
//! Report and structured syntheses are requested as JSON
//! (`{"sections": [...], "keyFindings": [...]}`). Models often answer in
//! markdown anyway, so the fallback splits the text on `##` headings and
//! recovers `[n]` citations and key findings from it.

use super::coercion::coerce_text_items;
use super::json::{Parsed, extract_json};
use crate::research::SynthesisSection;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("citation pattern is valid"));

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+(.+?)\s*$").expect("bullet pattern is valid")
});

/// Sections and findings recovered from a report-style response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredSynthesis {
    pub sections: Vec<SynthesisSection>,
    pub key_findings: Vec<String>,
}

/// Parse a report/structured response, JSON first, markdown second.
pub fn parse_structured(response: &str) -> Parsed<StructuredSynthesis> {
    if let Some(Value::Object(map)) = extract_json(response)
        && let Some(Value::Array(raw_sections)) = map.get("sections")
    {
        let sections = raw_sections.iter().filter_map(section_from_json).collect();
        let key_findings = map
            .get("keyFindings")
            .or_else(|| map.get("key_findings"))
            .and_then(Value::as_array)
            .map(|items| coerce_text_items(items))
            .unwrap_or_default();
        return Parsed::Ok(StructuredSynthesis {
            sections,
            key_findings,
        });
    }

    Parsed::Fallback(parse_markdown(response))
}

fn section_from_json(value: &Value) -> Option<SynthesisSection> {
    let map = value.as_object()?;
    let heading = map
        .get("heading")
        .or_else(|| map.get("title"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let content = map
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    if heading.is_empty() && content.is_empty() {
        return None;
    }

    let sources = match map.get("sources").and_then(Value::as_array) {
        Some(items) => coerce_text_items(items),
        None => extract_citations(&content),
    };

    Some(SynthesisSection {
        heading,
        content,
        sources,
    })
}

/// Split markdown on `##` headings.
///
/// Text before the first heading is dropped; deeper headings (`###`) stay
/// inside their section's content. Bullet lines under any heading that
/// mentions both "key" and "finding" become key findings.
pub fn parse_markdown(text: &str) -> StructuredSynthesis {
    let mut parsed = StructuredSynthesis::default();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(heading) = section_heading(line) {
            if let Some((heading, lines)) = current.take() {
                parsed.push_section(heading, &lines);
            }
            current = Some((heading.to_string(), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((heading, lines)) = current {
        parsed.push_section(heading, &lines);
    }

    parsed
}

impl StructuredSynthesis {
    fn push_section(&mut self, heading: String, lines: &[&str]) {
        let content = lines.join("\n").trim().to_string();

        if is_key_findings_heading(&heading) {
            self.key_findings.extend(extract_bullets(&content));
        }

        self.sections.push(SynthesisSection {
            sources: extract_citations(&content),
            heading,
            content,
        });
    }
}

fn section_heading(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    let heading = rest.trim();
    (!heading.is_empty()).then_some(heading)
}

fn is_key_findings_heading(heading: &str) -> bool {
    let lower = heading.to_lowercase();
    lower.contains("key") && lower.contains("finding")
}

/// Distinct `[n]` citation numbers in order of first appearance.
pub fn extract_citations(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in CITATION.captures_iter(text) {
        if let Some(number) = caps.get(1).map(|m| m.as_str().to_string())
            && !seen.contains(&number)
        {
            seen.push(number);
        }
    }
    seen
}

/// Text of every bulleted or numbered line.
pub fn extract_bullets(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| BULLET.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
