//! Tolerant reading of model replies.
//!
//! Models are asked to answer with a bare JSON object but routinely wrap it in
//! markdown fences, tag the fence with `json`, or add a sentence around it.
//! [`parse_reply_object`] recovers the object from all of those shapes and
//! [`ReplyFields`] reads individual keys with per-field defaults.

use serde_json::{Map, Value};
use thiserror::Error;

const FENCE: &str = "```";

/// Why a reply could not be read as a JSON object.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("reply is a JSON {found}, expected an object")]
    NotAnObject { found: &'static str },

    #[error("field `{field}` is not a number")]
    InvalidNumber { field: String },
}

/// Returns the part of `text` most likely to hold the JSON payload.
///
/// Fenced replies yield the first fenced segment that is tagged `json` (tag
/// removed) or starts with `{`. Anything else is returned trimmed.
pub fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.contains(FENCE) {
        return trimmed;
    }

    for segment in trimmed.split(FENCE) {
        let segment = segment.trim();
        if let Some(rest) = strip_json_tag(segment) {
            return rest.trim();
        }
        if segment.starts_with('{') {
            return segment;
        }
    }

    trimmed
}

fn strip_json_tag(segment: &str) -> Option<&str> {
    let tag = segment.get(..4)?;
    if tag.eq_ignore_ascii_case("json") {
        segment.get(4..)
    } else {
        None
    }
}

/// Span from the first `{` to the last `}`, if both exist in that order.
fn braced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parses a model reply into its top-level JSON object.
pub fn parse_reply_object(text: &str) -> Result<ReplyFields, ReplyError> {
    let block = extract_json_block(text);

    let value = match serde_json::from_str::<Value>(block) {
        Ok(value) => value,
        Err(err) => match braced_span(block) {
            Some(span) if span.len() < block.len() => {
                serde_json::from_str(span).map_err(|_| ReplyError::NotJson(err))?
            }
            _ => return Err(ReplyError::NotJson(err)),
        },
    };

    match value {
        Value::Object(map) => Ok(ReplyFields(map)),
        other => Err(ReplyError::NotAnObject {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Keys of a parsed reply, read with defaults.
///
/// A missing key and an explicit `null` both take the default.
#[derive(Debug, Clone, Default)]
pub struct ReplyFields(Map<String, Value>);

impl ReplyFields {
    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Raw value of a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.present(key)
    }

    /// Text value. Scalars are stringified and lists of scalars joined.
    pub fn text(&self, key: &str, default: &str) -> String {
        match self.present(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(scalar_text)
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => scalar_text(other).unwrap_or_else(|| other.to_string()),
        }
    }

    /// Boolean value, accepting `"true"`/`"false"` style strings and numbers.
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.present(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => {
                let s = s.trim().to_ascii_lowercase();
                !matches!(s.as_str(), "" | "false" | "no" | "0")
            }
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(Value::Null) => default,
        }
    }

    /// Numeric value. Numeric strings (optionally ending in `%`) are accepted;
    /// anything else is an error.
    pub fn number(&self, key: &str, default: f64) -> Result<f64, ReplyError> {
        let invalid = || ReplyError::InvalidNumber {
            field: key.to_string(),
        };

        let value = match self.present(key) {
            None => return Ok(default),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
            Some(Value::String(s)) => {
                let s = s.trim();
                let s = s.strip_suffix('%').unwrap_or(s).trim();
                s.parse::<f64>().map_err(|_| invalid())?
            }
            Some(_) => return Err(invalid()),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid())
        }
    }

    /// List of strings. A lone string is kept whole as a single item, since
    /// names like "Beans, climbing" carry their own commas. A blank string
    /// counts as missing.
    pub fn list(&self, key: &str, default: &[&str]) -> Vec<String> {
        let owned_default = || default.iter().map(|s| s.to_string()).collect();

        match self.present(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => owned_default(),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
