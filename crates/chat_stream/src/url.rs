/// Default backend origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8300";
/// Default chat endpoint path.
pub const DEFAULT_CHAT_ENDPOINT: &str = "/api/chat";

/// Join a base URL and endpoint path into the chat endpoint URL.
///
/// Normalization rules:
/// 1) blank base falls back to [`DEFAULT_BASE_URL`]
/// 2) keep the base unchanged when it already ends with the endpoint path
/// 3) otherwise join with exactly one `/`
pub fn normalize_chat_url(base: &str, endpoint: &str) -> String {
    let base = if base.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        base.trim()
    };
    let endpoint = if endpoint.trim().is_empty() {
        DEFAULT_CHAT_ENDPOINT
    } else {
        endpoint.trim()
    };

    let trimmed = base.trim_end_matches('/');
    let path = endpoint.trim_matches('/');
    if path.is_empty() {
        return trimmed.to_string();
    }
    if trimmed.ends_with(&format!("/{path}")) {
        return trimmed.to_string();
    }
    format!("{trimmed}/{path}")
}
