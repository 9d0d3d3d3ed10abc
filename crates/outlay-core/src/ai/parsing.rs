//! Reply interpretation for categorization responses
//!
//! Models frequently wrap the requested JSON in prose or a fenced code block
//! despite being told not to. These helpers extract the payload and parse it,
//! turning anything off-shape into an error the orchestrator converts to an
//! absent result. No range checking happens here; this stays a purely
//! syntactic parser.

use serde_json::Value;

use crate::error::{Error, Result};

use super::types::CategorySuggestion;

/// Extract the JSON payload from a reply that may be fenced
///
/// A block tagged ```json wins; otherwise the first generic fence is used;
/// otherwise the whole trimmed reply is the payload. Only the first fenced
/// block is considered, and text outside it is discarded.
fn extract_json_payload(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some((_, after)) = trimmed.split_once("```json") {
        after.split("```").next().unwrap_or(after).trim()
    } else if let Some((_, after)) = trimmed.split_once("```") {
        after.split("```").next().unwrap_or(after).trim()
    } else {
        trimmed
    }
}

/// Coerce a JSON value into a confidence float
///
/// Accepts numbers and numeric strings. Anything else present is invalid.
fn coerce_confidence(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse a category suggestion from a provider reply
///
/// The category name is trimmed; a missing confidence defaults to 0.0, but a
/// present non-numeric confidence is a parse failure. Out-of-range values
/// pass through untouched for the caller's policy to judge.
pub fn parse_suggestion(response: &str) -> Result<CategorySuggestion> {
    let payload = extract_json_payload(response);

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        // Truncate on a char boundary; the reply is provider-controlled and
        // may put a multibyte character anywhere.
        let truncated = if payload.chars().count() > 200 {
            format!("{}...", payload.chars().take(200).collect::<String>())
        } else {
            payload.to_string()
        };
        Error::InvalidData(format!("Invalid JSON from AI: {} | Raw: {}", e, truncated))
    })?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::InvalidData("AI reply is not a JSON object".into()))?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidData("AI reply has no category field".into()))?
        .trim()
        .to_string();

    let confidence = match object.get("confidence") {
        None => 0.0,
        Some(value) => coerce_confidence(value).ok_or_else(|| {
            Error::InvalidData(format!("Non-numeric confidence in AI reply: {}", value))
        })?,
    };

    Ok(CategorySuggestion {
        category,
        confidence,
    })
}
