use serde_json::Value;
use tracing::warn;

use crate::models::summary::SummaryResult;

/// Model output after an attempt to read it as a structured summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedSummary {
    Parsed(SummaryResult),
    /// The model ignored the JSON-only instruction; the text itself becomes the summary.
    Unparsed { raw_text: String },
}

impl NormalizedSummary {
    pub fn is_degraded(&self) -> bool {
        matches!(self, NormalizedSummary::Unparsed { .. })
    }

    pub fn into_result(self) -> SummaryResult {
        match self {
            NormalizedSummary::Parsed(result) => result,
            NormalizedSummary::Unparsed { raw_text } => SummaryResult {
                summary: raw_text,
                key_points: Vec::new(),
            },
        }
    }
}

/// Read the model's text as a summary object; never fails.
///
/// Any JSON object with a string `summary` counts as parsed. `key_points`
/// keeps the string items of an array and is empty for anything else.
pub fn normalize(raw: &str) -> NormalizedSummary {
    let trimmed = raw.trim();

    let fields = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => return unparsed(trimmed, &format!("expected an object, got {}", kind_of(&other))),
        Err(e) => return unparsed(trimmed, &e.to_string()),
    };

    let summary = match fields.get("summary").and_then(Value::as_str) {
        Some(summary) => summary.to_string(),
        None => return unparsed(trimmed, "no string summary field"),
    };

    NormalizedSummary::Parsed(SummaryResult {
        summary,
        key_points: key_points_from(fields.get("key_points")),
    })
}

fn key_points_from(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn unparsed(trimmed: &str, reason: &str) -> NormalizedSummary {
    warn!("Model output is not a summary object ({}), using raw text", reason);
    NormalizedSummary::Unparsed {
        raw_text: trimmed.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
