use chat_stream::{ChatRequest, ChatStreamClient, ChatStreamConfig, ChatStreamError};

#[test]
fn http_request_targets_chat_endpoint_with_json_body() {
    let config = ChatStreamConfig::new("https://widget.example.test/").with_endpoint("/api/chat");
    let client = ChatStreamClient::new(config).expect("client");

    let request = client
        .build_request("Hello")
        .expect("build request")
        .build()
        .expect("request");

    assert_eq!(request.url().as_str(), "https://widget.example.test/api/chat");
    assert_eq!(request.method(), "POST");
    assert_eq!(
        request.headers()["accept"].to_str().expect("ascii header"),
        "text/event-stream"
    );

    let body = request
        .body()
        .and_then(|body| body.as_bytes())
        .expect("buffered JSON body");
    let json: serde_json::Value = serde_json::from_slice(body).expect("JSON body");
    assert_eq!(json, serde_json::json!({ "message": "Hello" }));
}

#[test]
fn request_payload_includes_session_id_only_when_known() {
    let without = serde_json::to_value(ChatRequest::new("hi", None)).expect("serialize");
    assert!(without.get("session_id").is_none());

    let with = serde_json::to_value(ChatRequest::new("hi", Some("s-1".to_owned()))).expect("serialize");
    assert_eq!(with["session_id"], "s-1");
}

#[test]
fn unparseable_endpoint_is_reported() {
    let client = ChatStreamClient::new(ChatStreamConfig::new("not a url")).expect("client");
    assert!(matches!(
        client.build_request("hi"),
        Err(ChatStreamError::InvalidUrl(_))
    ));
}

#[test]
fn fresh_client_has_no_session() {
    let client = ChatStreamClient::new(ChatStreamConfig::default()).expect("client");
    assert_eq!(client.session_id(), None);
    assert_eq!(client.endpoint(), "http://localhost:8300/api/chat");
}
