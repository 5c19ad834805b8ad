//! Typed inputs and outputs of the four research tools.
//!
//! | Module | Tool | Input | Output |
//! |--------|------|-------|--------|
//! | [`search`] | `web_search` | [`SearchInput`] | [`SearchOutput`] |
//! | [`fetch`] | `web_fetch` | [`FetchInput`] | [`FetchedContent`] |
//! | [`analysis`] | `analyze_content` | [`AnalyzeInput`] | [`AnalysisOutput`] |
//! | [`synthesis`] | `synthesize_sources` | [`SynthesizeInput`] | [`SynthesisOutput`] |
//!
//! Payloads use camelCase JSON keys, matching the schemas the tools
//! advertise for LLM tool selection. Each input type owns its validation
//! predicate (`is_valid`) so the rules can be tested without any I/O.

pub mod analysis;
pub mod fetch;
pub mod search;
pub mod synthesis;

pub use analysis::{
    AnalysisOutput, AnalysisType, AnalyzeInput, Classification, EntityType, ExtractedEntity,
    ExtractedFact, ExtractionTarget, Sentiment, SentimentLabel,
};
pub use fetch::{FetchInput, FetchedContent, PageMetadata, is_html_content_type};
pub use search::{DateRange, SearchDepth, SearchHit, SearchInput, SearchOutput};
pub use synthesis::{
    Citation, OutputFormat, SourceDocument, SynthesisOutput, SynthesisSection, SynthesizeInput,
};
