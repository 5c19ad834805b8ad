//! Multi-source synthesis payloads and the confidence heuristic.

use serde::{Deserialize, Serialize};

/// Allowed range for `maxLength`.
pub const MAX_LENGTH_RANGE: std::ops::RangeInclusive<u32> = 100..=10_000;

/// Metadata keys consulted for a source's credibility score.
const CREDIBILITY_KEYS: [&str; 3] = ["credibility", "credibilityScore", "credibility_score"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Report,
    Bullets,
    Structured,
}

impl OutputFormat {
    /// Formats whose response is parsed into sections.
    pub fn is_sectioned(&self) -> bool {
        matches!(self, OutputFormat::Report | OutputFormat::Structured)
    }
}

/// One input document to synthesize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SourceDocument {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_credibility(mut self, score: f64) -> Self {
        self.metadata
            .get_or_insert_with(serde_json::Map::new)
            .insert("credibility".to_string(), serde_json::json!(score));
        self
    }

    /// Credibility declared in the source metadata, if any.
    pub fn credibility(&self) -> Option<f64> {
        let metadata = self.metadata.as_ref()?;
        CREDIBILITY_KEYS
            .iter()
            .find_map(|key| metadata.get(*key).and_then(serde_json::Value::as_f64))
    }
}

/// Input payload of the `synthesize_sources` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeInput {
    pub sources: Vec<SourceDocument>,
    pub synthesis_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    /// Approximate length budget in words
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl SynthesizeInput {
    pub fn new(goal: impl Into<String>, sources: Vec<SourceDocument>) -> Self {
        Self {
            sources,
            synthesis_goal: goal.into(),
            output_format: None,
            max_length: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or_default()
    }

    pub fn is_valid(&self) -> bool {
        !self.sources.is_empty()
            && self.sources.iter().all(|s| !s.content.trim().is_empty())
            && !self.synthesis_goal.trim().is_empty()
            && self.max_length.is_none_or(|n| MAX_LENGTH_RANGE.contains(&n))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSection {
    pub heading: String,
    pub content: String,
    /// Citation numbers referenced as `[n]` inside `content`
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub citation_number: usize,
}

impl Citation {
    /// One citation per source, numbered from 1 in input order.
    pub fn for_sources(sources: &[SourceDocument]) -> Vec<Citation> {
        sources
            .iter()
            .enumerate()
            .map(|(index, source)| Citation {
                url: source.url.clone(),
                title: source.title.clone(),
                citation_number: index + 1,
            })
            .collect()
    }
}

/// Output payload of the `synthesize_sources` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisOutput {
    pub synthesis: String,
    pub sections: Vec<SynthesisSection>,
    pub key_findings: Vec<String>,
    pub citations: Vec<Citation>,
    pub confidence: f64,
    pub output_format: OutputFormat,
    pub source_count: usize,
}

/// Deterministic confidence score for a synthesis.
///
/// Base 0.5, +0.1 per source (at most +0.3), +0.1 if any source declares a
/// credibility above 0.8, +0.1 if the mean content length exceeds 1000
/// characters; capped at 1.0. Computed in tenths so results are exact.
pub fn confidence_score(sources: &[SourceDocument]) -> f64 {
    let mut tenths = 5 + sources.len().min(3);

    if sources.iter().any(|s| s.credibility().is_some_and(|c| c > 0.8)) {
        tenths += 1;
    }

    if !sources.is_empty() {
        let total_chars: usize = sources.iter().map(|s| s.content.chars().count()).sum();
        if total_chars as f64 / sources.len() as f64 > 1000.0 {
            tenths += 1;
        }
    }

    (tenths.min(10) as f64) / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_single_short_source() {
        let sources = vec![SourceDocument::new("x".repeat(500))];
        assert_eq!(confidence_score(&sources), 0.6);
    }

    #[test]
    fn test_confidence_saturates() {
        let mut sources: Vec<SourceDocument> =
            (0..5).map(|_| SourceDocument::new("y".repeat(1500))).collect();
        sources[2] = sources[2].clone().with_credibility(0.95);
        assert_eq!(confidence_score(&sources), 1.0);
    }

    #[test]
    fn test_confidence_source_bonus_is_capped() {
        let sources: Vec<SourceDocument> = (0..8).map(|_| SourceDocument::new("z")).collect();
        assert_eq!(confidence_score(&sources), 0.8);
    }

    #[test]
    fn test_credibility_must_exceed_threshold() {
        let sources = vec![SourceDocument::new("short").with_credibility(0.8)];
        assert_eq!(confidence_score(&sources), 0.6);
    }

    #[test]
    fn test_citations_follow_input_order() {
        let sources = vec![
            SourceDocument::new("a").with_url("https://a.example"),
            SourceDocument::new("b").with_title("B"),
        ];
        let citations = Citation::for_sources(&sources);
        assert_eq!(citations[0].citation_number, 1);
        assert_eq!(citations[0].url.as_deref(), Some("https://a.example"));
        assert_eq!(citations[1].citation_number, 2);
        assert_eq!(citations[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn test_synthesize_input_validation() {
        let ok = SynthesizeInput::new("compare", vec![SourceDocument::new("text")]);
        assert!(ok.is_valid());
        assert!(!SynthesizeInput::new("compare", vec![]).is_valid());
        assert!(!SynthesizeInput::new(" ", vec![SourceDocument::new("text")]).is_valid());
        assert!(
            !SynthesizeInput::new("compare", vec![SourceDocument::new("text"), SourceDocument::new("")])
                .is_valid()
        );

        let mut too_short = ok.clone();
        too_short.max_length = Some(99);
        assert!(!too_short.is_valid());
        let mut in_range = ok;
        in_range.max_length = Some(10_000);
        assert!(in_range.is_valid());
    }

    #[test]
    fn test_credibility_keys() {
        let mut metadata = serde_json::Map::new();
        metadata.insert("credibilityScore".into(), serde_json::json!(0.9));
        let source = SourceDocument {
            metadata: Some(metadata),
            ..SourceDocument::new("x")
        };
        assert_eq!(source.credibility(), Some(0.9));
    }
}
