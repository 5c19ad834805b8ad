//! Defensive parsing of LLM responses.
//!
//! Pure text processing, no I/O. Parsers return [`Parsed`] rather than
//! `Result`: a malformed response is an expected input, answered with the
//! documented defaults from [`coercion`].

pub mod analysis;
pub mod coercion;
pub mod json;
pub mod synthesis;

pub use json::{Parsed, extract_json};
pub use synthesis::StructuredSynthesis;
