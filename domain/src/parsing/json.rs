//! Locating JSON inside free-form LLM responses.

use serde_json::Value;

/// Outcome of a defensive parse.
///
/// `Ok` means the response had the expected shape. `Fallback` means it did
/// not and the value was produced by a secondary strategy or the documented
/// defaults. Both carry a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Ok(T),
    Fallback(T),
}

impl<T> Parsed<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Parsed::Fallback(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Parsed::Ok(value) | Parsed::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Parsed::Ok(value) | Parsed::Fallback(value) => value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Ok(value) => Parsed::Ok(f(value)),
            Parsed::Fallback(value) => Parsed::Fallback(f(value)),
        }
    }
}

/// Extract the first JSON array or object from an LLM response.
///
/// Tries, in order: the whole trimmed response, the body of a ```` ``` ````
/// code fence, and the span from the first `[` or `{` to its balanced
/// closing bracket.
pub fn extract_json(response: &str) -> Option<Value> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed)
        && (value.is_array() || value.is_object())
    {
        return Some(value);
    }

    if let Some(body) = fenced_block(trimmed)
        && let Ok(value) = serde_json::from_str::<Value>(body.trim())
    {
        return Some(value);
    }

    let span = balanced_span(trimmed)?;
    serde_json::from_str(span).ok()
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    // Skip the language tag line (```json)
    let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// Span from the first opening bracket to its matching close, honoring
/// string literals and escapes.
fn balanced_span(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let candidate = &text[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in candidate.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '[' | '{' if !in_string => depth += 1,
            ']' | '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&candidate[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Items of a response that should be a list.
///
/// Accepts a bare array, or an object wrapping the array under `key`
/// (`{"facts": [...]}`). Any other shape yields `None`.
pub fn array_items(value: Value, key: &str) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_json() {
        assert_eq!(extract_json(r#"[{"a": 1}]"#), Some(json!([{"a": 1}])));
        assert_eq!(extract_json(r#"  {"score": 0.5}  "#), Some(json!({"score": 0.5})));
    }

    #[test]
    fn test_extract_from_code_fence() {
        let response = "Here you go:\n```json\n[\"rust\", \"tokio\"]\n```\nHope it helps.";
        assert_eq!(extract_json(response), Some(json!(["rust", "tokio"])));
    }

    #[test]
    fn test_extract_from_prose() {
        let response = r#"The entities are [{"text": "Mozilla", "type": "organization"}] as requested."#;
        assert_eq!(
            extract_json(response),
            Some(json!([{"text": "Mozilla", "type": "organization"}]))
        );
    }

    #[test]
    fn test_brackets_inside_strings() {
        let response = r#"Result: {"label": "neutral ]}", "score": 0} trailing"#;
        assert_eq!(
            extract_json(response),
            Some(json!({"label": "neutral ]}", "score": 0}))
        );
    }

    #[test]
    fn test_no_json() {
        assert_eq!(extract_json("no structured output here"), None);
        assert_eq!(extract_json(""), None);
        assert_eq!(extract_json("[unterminated"), None);
        // A bare scalar is not a usable payload
        assert_eq!(extract_json("42"), None);
    }

    #[test]
    fn test_array_items_unwraps_named_key() {
        assert_eq!(array_items(json!([1, 2]), "facts"), Some(vec![json!(1), json!(2)]));
        assert_eq!(array_items(json!({"facts": [1]}), "facts"), Some(vec![json!(1)]));
        assert_eq!(array_items(json!({"other": [1]}), "facts"), None);
        assert_eq!(array_items(json!("text"), "facts"), None);
    }

    #[test]
    fn test_parsed_accessors() {
        let ok = Parsed::Ok(3);
        let fallback = Parsed::Fallback(0);
        assert!(!ok.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(ok.map(|n| n * 2).into_inner(), 6);
        assert_eq!(*fallback.value(), 0);
    }
}
