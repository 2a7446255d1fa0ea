// src/core/error.rs
//! Errors surfaced by remote calls and form submissions

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Key under which errors that belong to no single field are reported
pub const FORM_KEY: &str = "form";

/// Per-field validation messages, shown next to the offending input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`; a second message for the same field is appended
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        self.errors
            .entry(field.into())
            .and_modify(|existing| {
                existing.push(' ');
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Build from a REST validation body: `{"field": ["msg", ...]}` or `{"field": "msg"}`.
    ///
    /// `non_field_errors`, `detail` and `error` are reported under [`FORM_KEY`].
    /// Returns `None` when the body carries no usable message.
    pub fn from_response_body(body: &Value) -> Option<Self> {
        let mut errors = Self::new();

        match body {
            Value::Object(map) => {
                for (key, value) in map {
                    let field = match key.as_str() {
                        "non_field_errors" | "detail" | "error" => FORM_KEY,
                        other => other,
                    };
                    for message in messages_of(value) {
                        errors.insert(field, message);
                    }
                }
            }
            other => {
                for message in messages_of(other) {
                    errors.insert(FORM_KEY, message);
                }
            }
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(messages_of).collect(),
        Value::Object(map) => map.values().flat_map(messages_of).collect(),
        _ => Vec::new(),
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Failure of a remote read or submission.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Credentials missing, expired, or refresh rejected
    #[error("Not authorized, please log in again")]
    Unauthorized,

    /// Local or server-side validation rejected a submission
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
