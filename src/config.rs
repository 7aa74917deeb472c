//! Environment configuration.

use std::env;
use std::time::Duration;

use chat_stream::url::{DEFAULT_BASE_URL, DEFAULT_CHAT_ENDPOINT};
use chat_stream::ChatStreamConfig;
use thiserror::Error;

pub const ENV_API_URL: &str = "CHAT_WIDGET_API_URL";
pub const ENV_ENDPOINT: &str = "CHAT_WIDGET_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "CHAT_WIDGET_TIMEOUT_SECS";
pub const ENV_SCROLL_DEBOUNCE_MS: &str = "CHAT_WIDGET_SCROLL_DEBOUNCE_MS";
pub const ENV_SCROLL_TO_BOTTOM_DELAY_MS: &str = "CHAT_WIDGET_SCROLL_TO_BOTTOM_DELAY_MS";
pub const ENV_FALLBACK_CONTACT: &str = "CHAT_WIDGET_FALLBACK_CONTACT";
pub const ENV_GREETING: &str = "CHAT_WIDGET_GREETING";
pub const ENV_LOG: &str = "CHAT_WIDGET_LOG";

pub const DEFAULT_SCROLL_DEBOUNCE: Duration = Duration::from_millis(50);
pub const DEFAULT_SCROLL_TO_BOTTOM_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_FALLBACK_CONTACT: &str = "our service desk";
pub const DEFAULT_LOG_DIRECTIVE: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub api_url: String,
    pub endpoint: String,
    pub request_timeout: Option<Duration>,
    pub scroll_debounce: Duration,
    pub scroll_to_bottom_delay: Duration,
    /// Contact line appended to every error message shown in the transcript.
    pub fallback_contact: String,
    /// Assistant message shown before the first exchange.
    pub greeting: Option<String>,
    /// `tracing-subscriber` directive used when `RUST_LOG` is unset.
    pub log_directive: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            request_timeout: None,
            scroll_debounce: DEFAULT_SCROLL_DEBOUNCE,
            scroll_to_bottom_delay: DEFAULT_SCROLL_TO_BOTTOM_DELAY,
            fallback_contact: DEFAULT_FALLBACK_CONTACT.to_string(),
            greeting: None,
            log_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_url: env_string_opt(ENV_API_URL).unwrap_or(defaults.api_url),
            endpoint: env_string_opt(ENV_ENDPOINT).unwrap_or(defaults.endpoint),
            request_timeout: env_u64(ENV_TIMEOUT_SECS)?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            scroll_debounce: env_u64(ENV_SCROLL_DEBOUNCE_MS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.scroll_debounce),
            scroll_to_bottom_delay: env_u64(ENV_SCROLL_TO_BOTTOM_DELAY_MS)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.scroll_to_bottom_delay),
            fallback_contact: env_string_opt(ENV_FALLBACK_CONTACT)
                .unwrap_or(defaults.fallback_contact),
            greeting: env_string_opt(ENV_GREETING),
            log_directive: env_string_opt(ENV_LOG).unwrap_or(defaults.log_directive),
        })
    }

    pub fn stream_config(&self) -> ChatStreamConfig {
        let config = ChatStreamConfig::new(self.api_url.clone()).with_endpoint(self.endpoint.clone());
        match self.request_timeout {
            Some(timeout) => config.with_timeout(timeout),
            None => config,
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u64(key: &'static str) -> Result<Option<u64>, ConfigError> {
    let Some(value) = env_string_opt(key) else {
        return Ok(None);
    };
    value
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}
