use std::collections::BTreeMap;
use std::time::Duration;

use crate::parser::DEFAULT_RECORD_PREFIX;
use crate::url::{DEFAULT_BASE_URL, DEFAULT_CHAT_ENDPOINT};

/// Transport configuration for chat exchanges.
#[derive(Debug, Clone)]
pub struct ChatStreamConfig {
    /// Backend origin, e.g. `https://example.test`.
    pub base_url: String,
    /// Chat endpoint path joined onto `base_url`.
    pub endpoint: String,
    /// Prefix marking a record line in the response body.
    pub record_prefix: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
}

impl Default for ChatStreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            record_prefix: DEFAULT_RECORD_PREFIX.to_string(),
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }
}

impl ChatStreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_record_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.record_prefix = prefix.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}
