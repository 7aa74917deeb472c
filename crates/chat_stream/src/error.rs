use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug)]
pub enum ChatStreamError {
    EmptyMessage,
    InvalidUrl(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Body(String),
    Protocol(String),
    Incomplete,
}

impl ChatStreamError {
    /// Human-readable description handed to `on_error` callbacks.
    pub fn user_message(&self) -> String {
        match self {
            Self::Protocol(message) => message.clone(),
            Self::Status(status, message) if message.is_empty() => {
                format!("server responded with HTTP {}", status.as_u16())
            }
            Self::Status(status, message) => {
                format!("server responded with HTTP {}: {message}", status.as_u16())
            }
            Self::Request(error) if error.is_timeout() => "the request timed out".to_owned(),
            Self::Request(error) if error.is_connect() => {
                "could not connect to the chat service".to_owned()
            }
            other => other.to_string(),
        }
    }

    /// Whether the failure came from the backend's own `error` record.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

impl fmt::Display for ChatStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "message must not be empty"),
            Self::InvalidUrl(value) => write!(f, "invalid chat endpoint URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) if message.is_empty() => {
                write!(f, "HTTP {}", status.as_u16())
            }
            Self::Status(status, message) => write!(f, "HTTP {}: {message}", status.as_u16()),
            Self::Body(message) => write!(f, "response body failed: {message}"),
            Self::Protocol(message) => write!(f, "backend error: {message}"),
            Self::Incomplete => write!(f, "stream ended before completion"),
        }
    }
}

impl std::error::Error for ChatStreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatStreamError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<Value>,
}

/// Extract a readable message from a non-success response body.
///
/// The backend answers validation failures with `{"error": "..."}`; other
/// gateways may nest `{"error": {"message": "..."}}`. Anything else falls back
/// to the raw body, then to the status reason phrase.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        let message = match payload.error {
            Some(Value::String(message)) => Some(message),
            Some(Value::Object(fields)) => fields
                .get("message")
                .and_then(|value| value.as_str())
                .map(ToString::to_string),
            _ => None,
        };
        if let Some(message) = message.filter(|message| !message.trim().is_empty()) {
            return message.trim().to_owned();
        }
    }

    if body.is_empty() || body.starts_with('<') {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}
