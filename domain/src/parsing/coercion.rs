//! Per-field coercion tables for LLM-produced records.
//!
//! Each record kind has a table of [`FieldRule`]s naming the field, the
//! shape it must have and the value substituted when it is missing or
//! malformed. [`coerce_record`] applies a table to one JSON item and
//! returns a normalized object ready for `serde_json::from_value`.
//!
//! | Table | Field | Kind | Default |
//! |-------|-------|------|---------|
//! | [`FACT_FIELDS`] | `statement` | text | required |
//! | | `confidence` | score `[0, 1]` | 0.7 |
//! | | `sources` | text list | `[]` |
//! | [`ENTITY_FIELDS`] | `text` | text | required |
//! | | `type` | label | `"other"` |
//! | | `confidence` | score `[0, 1]` | 0.7 |
//! | [`CLASSIFICATION_FIELDS`] | `category` | text | `"uncategorized"` |
//! | | `confidence` | score `[0, 1]` | 0.5 |
//! | [`SENTIMENT_FIELDS`] | `score` | score `[-1, 1]` | 0 |
//! | | `label` | label | `"neutral"` |
//!
//! A required field is the record's identity: an item without it carries
//! nothing to default and is skipped. Every other field is defaulted,
//! never grounds for dropping the item.

use serde_json::{Map, Value};

/// Confidence assigned to a JSON fact without a usable confidence.
pub const DEFAULT_FACT_CONFIDENCE: f64 = 0.7;
/// Confidence assigned to a fact recovered by the line-oriented fallback.
pub const FALLBACK_FACT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_ENTITY_CONFIDENCE: f64 = 0.7;
pub const DEFAULT_CLASSIFICATION_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_CATEGORY: &str = "uncategorized";

pub const ENTITY_TYPES: &[&str] = &[
    "person",
    "organization",
    "location",
    "date",
    "product",
    "technology",
    "event",
    "concept",
    "other",
];

pub const SENTIMENT_LABELS: &[&str] = &["positive", "negative", "neutral"];

/// Shape a field must have to be kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Non-empty string (numbers are stringified)
    Text,
    /// Number, or numeric string, clamped into `[min, max]`
    Score { min: f64, max: f64 },
    /// One of a closed set, compared case-insensitively
    Label(&'static [&'static str]),
    /// Array of strings; non-string entries are stringified or skipped
    TextList,
}

/// Value used when a field is missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    /// The item is skipped
    Required,
    Text(&'static str),
    Number(f64),
    EmptyList,
}

impl FieldDefault {
    fn to_value(self) -> Option<Value> {
        match self {
            FieldDefault::Required => None,
            FieldDefault::Text(text) => Some(Value::String(text.to_string())),
            FieldDefault::Number(n) => Some(number(n)),
            FieldDefault::EmptyList => Some(Value::Array(Vec::new())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

const UNIT: FieldKind = FieldKind::Score { min: 0.0, max: 1.0 };

pub const FACT_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "statement",
        kind: FieldKind::Text,
        default: FieldDefault::Required,
    },
    FieldRule {
        name: "confidence",
        kind: UNIT,
        default: FieldDefault::Number(DEFAULT_FACT_CONFIDENCE),
    },
    FieldRule {
        name: "sources",
        kind: FieldKind::TextList,
        default: FieldDefault::EmptyList,
    },
];

pub const ENTITY_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "text",
        kind: FieldKind::Text,
        default: FieldDefault::Required,
    },
    FieldRule {
        name: "type",
        kind: FieldKind::Label(ENTITY_TYPES),
        default: FieldDefault::Text("other"),
    },
    FieldRule {
        name: "confidence",
        kind: UNIT,
        default: FieldDefault::Number(DEFAULT_ENTITY_CONFIDENCE),
    },
];

pub const CLASSIFICATION_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "category",
        kind: FieldKind::Text,
        default: FieldDefault::Text(DEFAULT_CATEGORY),
    },
    FieldRule {
        name: "confidence",
        kind: UNIT,
        default: FieldDefault::Number(DEFAULT_CLASSIFICATION_CONFIDENCE),
    },
];

pub const SENTIMENT_FIELDS: &[FieldRule] = &[
    FieldRule {
        name: "score",
        kind: FieldKind::Score {
            min: -1.0,
            max: 1.0,
        },
        default: FieldDefault::Number(0.0),
    },
    FieldRule {
        name: "label",
        kind: FieldKind::Label(SENTIMENT_LABELS),
        default: FieldDefault::Text("neutral"),
    },
];

/// Normalize one item against `rules`.
///
/// A bare string item is read as the value of the first rule's field, so
/// `["Rust is fast"]` coerces like `[{"statement": "Rust is fast"}]`.
/// Returns `None` only when a [`FieldDefault::Required`] field is unusable.
pub fn coerce_record(item: &Value, rules: &[FieldRule]) -> Option<Map<String, Value>> {
    let mut out = Map::new();

    for (index, rule) in rules.iter().enumerate() {
        let raw = match item {
            Value::Object(map) => map.get(rule.name),
            Value::String(_) if index == 0 => Some(item),
            _ => None,
        };

        let value = match raw.and_then(|v| coerce_field(v, rule.kind)) {
            Some(value) => value,
            None => rule.default.to_value()?,
        };
        out.insert(rule.name.to_string(), value);
    }

    Some(out)
}

/// Coerce a single value, or `None` when it cannot satisfy `kind`.
pub fn coerce_field(value: &Value, kind: FieldKind) -> Option<Value> {
    match kind {
        FieldKind::Text => text_of(value).map(Value::String),
        FieldKind::Score { min, max } => {
            let n = match value {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.trim().parse::<f64>().ok()?,
                _ => return None,
            };
            if !n.is_finite() {
                return None;
            }
            Some(number(n.clamp(min, max)))
        }
        FieldKind::Label(allowed) => {
            let label = value.as_str()?.trim().to_lowercase();
            allowed
                .contains(&label.as_str())
                .then(|| Value::String(label))
        }
        FieldKind::TextList => {
            let items = value.as_array()?;
            Some(Value::Array(
                items.iter().filter_map(text_of).map(Value::String).collect(),
            ))
        }
    }
}

/// Strings from a list-shaped response, e.g. key phrases.
///
/// Accepts strings and objects carrying a `text` field.
pub fn coerce_text_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => map.get("text").and_then(text_of),
            other => text_of(other),
        })
        .collect()
}

fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn number(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
