//! JSON parsing utilities for LLM responses.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{ErrorCode, RecapError, RecapResult};

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("valid regex"));

static FENCED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[a-zA-Z0-9]*\n?([\s\S]*?)\n?```$").expect("valid regex"));

static THINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

/// Extract JSON from potentially wrapped response (code blocks, etc.).
pub fn extract_json(text: &str) -> String {
    let text = text.trim();

    if let Some(content) = CODE_BLOCK_RE.captures(text).and_then(|c| c.get(1)) {
        return content.as_str().trim().to_string();
    }

    text.to_string()
}

/// Remove code blocks and thinking tags from response.
pub fn remove_code_blocks(content: &str) -> String {
    let content = content.trim();

    let content = FENCED_RE
        .captures(content)
        .and_then(|c| c.get(1).map(|m| m.as_str().trim()))
        .unwrap_or(content);

    THINK_RE.replace_all(content, "").trim().to_string()
}

/// Parse a JSON object out of free-form model output.
pub fn parse_json_object(response: &str) -> RecapResult<Map<String, Value>> {
    let cleaned = remove_code_blocks(response);
    let json_str = extract_json(&cleaned);

    match serde_json::from_str::<Value>(&json_str) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RecapError::Parse {
            message: format!("Expected a JSON object, got {}", type_name(&other)),
            code: ErrorCode::ParseInvalidJson,
        }),
        Err(e) => Err(RecapError::Parse {
            message: format!("Failed to parse JSON: {}", e),
            code: ErrorCode::ParseInvalidJson,
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
