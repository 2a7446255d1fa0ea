use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::error::FetchError;

// ===== Auth =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshResponse {
    pub access: String,
}

// ===== List envelopes =====

/// Keys under which list endpoints have been seen to nest their items
const LIST_KEYS: [&str; 3] = ["results", "jobs", "data"];

/// Pull the item array out of a list response.
///
/// Accepts a bare array or an object carrying the array under `results`
/// (paginated), `jobs` or `data`.
pub fn extract_list(body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                let keys: Vec<&String> = map.keys().collect();
                FetchError::Decode(format!("no list found in response object (keys: {:?})", keys))
            }),
        other => Err(FetchError::Decode(format!(
            "expected a list response, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decode the items of a list response into `T`.
///
/// Items that do not fit `T` are logged and skipped; only a body with no list
/// at all is an error.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, FetchError> {
    let items = extract_list(body)?;
    let total = items.len();

    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping list item {}: {}", i, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!("Decoded {} of {} list items", decoded.len(), total);
    }
    Ok(decoded)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Best human-readable message from an error body
pub fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    if body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        body.trim().to_string()
    }
}
