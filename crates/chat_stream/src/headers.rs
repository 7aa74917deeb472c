use std::collections::BTreeMap;

use crate::config::ChatStreamConfig;
use crate::error::ChatStreamError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_CACHE_CONTROL: &str = "cache-control";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Build a deterministic header map for chat requests.
///
/// Extra headers are lower-cased and override the defaults.
pub fn build_headers(config: &ChatStreamConfig) -> Result<BTreeMap<String, String>, ChatStreamError> {
    let mut headers = BTreeMap::new();

    headers.insert(HEADER_ACCEPT.to_owned(), "text/event-stream".to_owned());
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );
    headers.insert(HEADER_CACHE_CONTROL.to_owned(), "no-cache".to_owned());

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(ChatStreamError::InvalidHeader(
                "header name must not be empty".to_owned(),
            ));
        }
        headers.insert(key, value.trim().to_owned());
    }

    Ok(headers)
}

fn default_user_agent() -> String {
    format!(
        "chat_stream/{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[cfg(test)]
mod tests {
    use super::{build_headers, HEADER_ACCEPT, HEADER_CONTENT_TYPE, HEADER_USER_AGENT};
    use crate::config::ChatStreamConfig;
    use crate::error::ChatStreamError;

    #[test]
    fn default_headers_request_event_stream() {
        let headers = build_headers(&ChatStreamConfig::default()).expect("headers");
        assert_eq!(headers[HEADER_ACCEPT], "text/event-stream");
        assert_eq!(headers[HEADER_CONTENT_TYPE], "application/json");
        assert!(headers[HEADER_USER_AGENT].starts_with("chat_stream/"));
    }

    #[test]
    fn extra_headers_are_normalized_and_override_defaults() {
        let config = ChatStreamConfig::default()
            .with_user_agent("widget/1.0")
            .insert_header(" X-Widget-Origin ", " portal ")
            .insert_header("Accept", "application/x-ndjson");

        let headers = build_headers(&config).expect("headers");
        assert_eq!(headers["x-widget-origin"], "portal");
        assert_eq!(headers[HEADER_ACCEPT], "application/x-ndjson");
        assert_eq!(headers[HEADER_USER_AGENT], "widget/1.0");
    }

    #[test]
    fn blank_header_name_is_rejected() {
        let config = ChatStreamConfig::default().insert_header("  ", "value");
        assert!(matches!(
            build_headers(&config),
            Err(ChatStreamError::InvalidHeader(_))
        ));
    }
}
