//! JSON parsing utilities for LLM responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{LearnSyncError, LearnSyncResult};

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json|JSON)?\s*([\s\S]*?)\s*```").expect("valid regex"));

/// Extract JSON from a potentially wrapped response.
///
/// Returns the body of the first fenced code block if there is one,
/// otherwise the trimmed input.
pub fn extract_json(text: &str) -> &str {
    let text = text.trim();

    CODE_BLOCK_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(text)
}

/// Parse a typed payload out of an LLM response.
pub fn parse_response<T: DeserializeOwned>(response: &str) -> LearnSyncResult<T> {
    let json_str = extract_json(response);
    if json_str.is_empty() {
        return Err(LearnSyncError::parse("Empty response"));
    }

    serde_json::from_str(json_str)
        .map_err(|e| LearnSyncError::parse(format!("Failed to parse response JSON: {}", e)))
}

/// Decode each element of a JSON array on its own, skipping the ones that
/// do not fit `T`.
pub fn parse_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if parsed.len() < total {
        debug!(dropped = total - parsed.len(), total, "Skipped malformed items");
    }
    parsed
}
