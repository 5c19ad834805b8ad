//! Parsers for the analysis sub-task responses.
//!
//! None of these fail: a response without the expected shape yields
//! [`Parsed::Fallback`] with the documented default, so one malformed
//! completion degrades its part of the analysis instead of aborting it.

use super::coercion::{
    CLASSIFICATION_FIELDS, ENTITY_FIELDS, FACT_FIELDS, FALLBACK_FACT_CONFIDENCE, FieldRule,
    SENTIMENT_FIELDS, coerce_record, coerce_text_items,
};
use super::json::{Parsed, array_items, extract_json};
use crate::research::{Classification, ExtractedEntity, ExtractedFact, Sentiment};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;

/// `- Statement (confidence: 0.9)`, also `*`, `•` and `1.` markers.
static FACT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*•]|\d+[.)])\s+(.+?)(?:\s*\(\s*confidence\s*:\s*([0-9]*\.?[0-9]+)\s*\))?\s*$",
    )
    .expect("fact line pattern is valid")
});

/// Facts from a JSON array, else from bullet lines.
pub fn parse_facts(response: &str) -> Parsed<Vec<ExtractedFact>> {
    if let Some(items) = extract_json(response).and_then(|v| array_items(v, "facts")) {
        return Parsed::Ok(coerce_all(&items, FACT_FIELDS));
    }
    Parsed::Fallback(parse_fact_lines(response))
}

/// Line-oriented fallback for fact extraction.
///
/// Only bulleted or numbered lines are considered; a missing or malformed
/// confidence becomes the fallback confidence.
pub fn parse_fact_lines(text: &str) -> Vec<ExtractedFact> {
    text.lines()
        .filter_map(|line| {
            let caps = FACT_LINE.captures(line)?;
            let statement = caps.get(1)?.as_str().trim();
            if statement.is_empty() {
                return None;
            }
            let confidence = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(FALLBACK_FACT_CONFIDENCE);
            Some(ExtractedFact {
                statement: statement.to_string(),
                confidence,
                sources: Vec::new(),
            })
        })
        .collect()
}

pub fn parse_entities(response: &str) -> Parsed<Vec<ExtractedEntity>> {
    match extract_json(response).and_then(|v| array_items(v, "entities")) {
        Some(items) => Parsed::Ok(coerce_all(&items, ENTITY_FIELDS)),
        None => Parsed::Fallback(Vec::new()),
    }
}

/// A plain list of strings, such as key phrases or concepts.
pub fn parse_string_list(response: &str, key: &str) -> Parsed<Vec<String>> {
    match extract_json(response).and_then(|v| array_items(v, key)) {
        Some(items) => Parsed::Ok(coerce_text_items(&items)),
        None => Parsed::Fallback(Vec::new()),
    }
}

/// Sentiment object; anything else is neutral with score 0.
pub fn parse_sentiment(response: &str) -> Parsed<Sentiment> {
    match extract_json(response) {
        Some(value @ Value::Object(_)) => Parsed::Ok(coerce_one(&value, SENTIMENT_FIELDS)),
        _ => Parsed::Fallback(Sentiment::default()),
    }
}

/// Classifications from an array, a wrapped array or a single object.
pub fn parse_classifications(response: &str) -> Parsed<Vec<Classification>> {
    let Some(value) = extract_json(response) else {
        return Parsed::Fallback(Vec::new());
    };

    let single = value
        .as_object()
        .is_some_and(|map| !map.contains_key("classifications"));
    let items = if single {
        vec![value]
    } else {
        match array_items(value, "classifications") {
            Some(items) => items,
            None => return Parsed::Fallback(Vec::new()),
        }
    };

    Parsed::Ok(coerce_all(&items, CLASSIFICATION_FIELDS))
}

fn coerce_all<T: DeserializeOwned>(items: &[Value], rules: &[FieldRule]) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| coerce_record(item, rules))
        .filter_map(|record| serde_json::from_value(Value::Object(record)).ok())
        .collect()
}

fn coerce_one<T: DeserializeOwned + Default>(
    item: &Value,
    rules: &[FieldRule],
) -> T {
    coerce_record(item, rules)
        .and_then(|record| serde_json::from_value(Value::Object(record)).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::{EntityType, SentimentLabel};

    #[test]
    fn test_fact_line_pattern_compiles() {
        assert!(FACT_LINE.is_match("- Rust 1.0 shipped in 2015 (confidence: 0.9)"));
        assert!(!FACT_LINE.is_match("plain prose line"));
    }

    #[test]
    fn test_parse_facts_json() {
        let response = r#"[
            {"statement": "Rust 1.0 was released in May 2015", "confidence": 0.95},
            {"statement": "Cargo is the Rust package manager"},
            {"confidence": 0.4}
        ]"#;
        let parsed = parse_facts(response);
        assert!(!parsed.is_fallback());
        let facts = parsed.into_inner();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].confidence, 0.95);
        assert_eq!(facts[1].confidence, 0.7);
    }

    #[test]
    fn test_parse_facts_text_fallback() {
        let response = "Here are the facts:\n\
            - Rust guarantees memory safety (confidence: 0.9)\n\
            * The borrow checker runs at compile time\n\
            2. Ferris is the mascot (Confidence: 1.5)\n\
            Not a bullet line";
        let parsed = parse_facts(response);
        assert!(parsed.is_fallback());
        let facts = parsed.into_inner();
        assert_eq!(facts.len(), 3);
        assert_eq!(facts[0].statement, "Rust guarantees memory safety");
        assert_eq!(facts[0].confidence, 0.9);
        assert_eq!(facts[1].confidence, 0.5);
        assert_eq!(facts[2].statement, "Ferris is the mascot");
        assert_eq!(facts[2].confidence, 1.0);
    }

    #[test]
    fn test_parse_facts_never_fails() {
        let parsed = parse_facts("I could not find any facts in this text.");
        assert!(parsed.is_fallback());
        assert!(parsed.into_inner().is_empty());
    }

    #[test]
    fn test_parse_entities() {
        let response = r#"```json
{"entities": [
  {"text": "Mozilla", "type": "organization", "confidence": 0.9},
  {"text": "Graydon Hoare", "type": "inventor"},
  {"type": "person"}
]}
```"#;
        let entities = parse_entities(response).into_inner();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, EntityType::Organization);
        assert_eq!(entities[1].entity_type, EntityType::Other);
        assert_eq!(entities[1].confidence, 0.7);

        assert!(parse_entities("none").is_fallback());
    }

    #[test]
    fn test_parse_string_list() {
        let parsed = parse_string_list(r#"["zero-cost abstractions", "ownership"]"#, "keyPhrases");
        assert_eq!(parsed.into_inner(), vec!["zero-cost abstractions", "ownership"]);
        assert!(parse_string_list("ownership, borrowing", "concepts").is_fallback());
    }

    #[test]
    fn test_parse_sentiment() {
        let sentiment = parse_sentiment(r#"{"score": 0.6, "label": "positive"}"#).into_inner();
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert_eq!(sentiment.score, 0.6);

        let sentiment = parse_sentiment(r#"{"score": "n/a", "label": "mixed"}"#).into_inner();
        assert_eq!(sentiment.label, SentimentLabel::Neutral);
        assert_eq!(sentiment.score, 0.0);

        let parsed = parse_sentiment("The tone is upbeat.");
        assert!(parsed.is_fallback());
        assert_eq!(parsed.into_inner(), Sentiment::default());

        assert!(parse_sentiment("[1, 2]").is_fallback());
    }

    #[test]
    fn test_parse_classifications_keeps_malformed_entries() {
        let response = r#"[{"category": "technology", "confidence": 0.8}, {"confidence": "high"}, 3]"#;
        let classes = parse_classifications(response).into_inner();
        assert_eq!(classes.len(), 3);
        assert_eq!(classes[1].category, "uncategorized");
        assert_eq!(classes[1].confidence, 0.5);
        assert_eq!(classes[2].category, "uncategorized");
    }

    #[test]
    fn test_parse_classifications_shapes() {
        let single = parse_classifications(r#"{"category": "science"}"#).into_inner();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].category, "science");

        let wrapped =
            parse_classifications(r#"{"classifications": [{"category": "news"}]}"#).into_inner();
        assert_eq!(wrapped[0].category, "news");

        assert!(parse_classifications("technology").is_fallback());
    }
}
