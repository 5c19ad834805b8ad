//! Content analysis payloads.
//!
//! Every field an LLM may omit or malform has a documented default (see
//! [`crate::parsing::coercion`]); nothing in [`AnalysisOutput`] is ever left
//! in an undefined state.

use serde::{Deserialize, Serialize};

/// Hard cap on the analyzed content, in characters.
pub const MAX_ANALYSIS_CHARS: usize = 100_000;

/// Which analyses to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Extract,
    Summarize,
    Classify,
    Sentiment,
    #[default]
    All,
}

impl AnalysisType {
    pub fn runs_extraction(&self) -> bool {
        matches!(self, AnalysisType::Extract | AnalysisType::All)
    }

    pub fn runs_summary(&self) -> bool {
        matches!(self, AnalysisType::Summarize | AnalysisType::All)
    }

    pub fn runs_classification(&self) -> bool {
        matches!(self, AnalysisType::Classify | AnalysisType::All)
    }

    pub fn runs_sentiment(&self) -> bool {
        matches!(self, AnalysisType::Sentiment | AnalysisType::All)
    }
}

/// Extraction sub-tasks selectable through `extractionTargets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionTarget {
    Facts,
    Entities,
    KeyPhrases,
    Concepts,
}

impl ExtractionTarget {
    pub const ALL: [ExtractionTarget; 4] = [
        ExtractionTarget::Facts,
        ExtractionTarget::Entities,
        ExtractionTarget::KeyPhrases,
        ExtractionTarget::Concepts,
    ];
}

/// Input payload of the `analyze_content` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeInput {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_targets: Option<Vec<ExtractionTarget>>,
}

impl AnalyzeInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            analysis_type: None,
            extraction_targets: None,
        }
    }

    pub fn with_type(mut self, analysis_type: AnalysisType) -> Self {
        self.analysis_type = Some(analysis_type);
        self
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = ExtractionTarget>) -> Self {
        self.extraction_targets = Some(targets.into_iter().collect());
        self
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type.unwrap_or_default()
    }

    /// Whether the extraction wave includes `target`.
    pub fn targets(&self, target: ExtractionTarget) -> bool {
        match &self.extraction_targets {
            Some(targets) if !targets.is_empty() => targets.contains(&target),
            _ => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.content.trim().is_empty() && self.content.chars().count() <= MAX_ANALYSIS_CHARS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFact {
    pub statement: String,
    pub confidence: f64,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
    Location,
    Date,
    Product,
    Technology,
    Event,
    Concept,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub text: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

/// Sentiment with `score ∈ [-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
}

/// Output payload of the `analyze_content` tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutput {
    pub analysis_type: AnalysisType,
    pub facts: Vec<ExtractedFact>,
    pub entities: Vec<ExtractedEntity>,
    pub key_phrases: Vec<String>,
    pub concepts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    pub classifications: Vec<Classification>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_dispatch() {
        assert!(AnalysisType::All.runs_extraction());
        assert!(AnalysisType::All.runs_sentiment());
        assert!(AnalysisType::Extract.runs_extraction());
        assert!(!AnalysisType::Extract.runs_summary());
        assert!(AnalysisType::Classify.runs_classification());
        assert!(!AnalysisType::Sentiment.runs_classification());
    }

    #[test]
    fn test_analyze_input_validation() {
        assert!(AnalyzeInput::new("Rust 1.0 shipped in 2015.").is_valid());
        assert!(!AnalyzeInput::new(" \n\t ").is_valid());
        assert!(AnalyzeInput::new("a".repeat(MAX_ANALYSIS_CHARS)).is_valid());
        assert!(!AnalyzeInput::new("a".repeat(MAX_ANALYSIS_CHARS + 1)).is_valid());
    }

    #[test]
    fn test_extraction_targets_default_to_all() {
        let input = AnalyzeInput::new("text");
        assert!(ExtractionTarget::ALL.iter().all(|t| input.targets(*t)));

        let input = input.with_targets([ExtractionTarget::Facts]);
        assert!(input.targets(ExtractionTarget::Facts));
        assert!(!input.targets(ExtractionTarget::Concepts));
    }

    #[test]
    fn test_unknown_entity_type_becomes_other() {
        let entity: ExtractedEntity = serde_json::from_value(serde_json::json!({
            "text": "Ferris", "type": "mascot", "confidence": 0.9
        }))
        .unwrap();
        assert_eq!(entity.entity_type, EntityType::Other);
    }

    #[test]
    fn test_analysis_type_rejects_unknown() {
        let parsed: Result<AnalyzeInput, _> = serde_json::from_value(serde_json::json!({
            "content": "x", "analysisType": "translate"
        }));
        assert!(parsed.is_err());
    }
}
