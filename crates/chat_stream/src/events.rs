use serde_json::Value;

/// Record type tag carried in the `type` field of every streamed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Incremental assistant text.
    Text,
    /// Successful end of the exchange.
    End,
    /// Backend-reported failure; `content` holds the message.
    Error,
    /// Session announcement sent before any text.
    Session,
    /// Retrieval snippets backing the answer.
    Sources,
}

impl RecordKind {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "text" => Self::Text,
            "end" => Self::End,
            "error" => Self::Error,
            "session" => Self::Session,
            "sources" => Self::Sources,
            _ => return None,
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::End | Self::Error)
    }
}

/// One retrieval snippet attached to an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    pub text: String,
}

/// Decoded `content` field. Only `sources` records carry a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordContent {
    Text(String),
    Sources(Vec<SourceItem>),
}

impl RecordContent {
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Sources(_) => "",
        }
    }
}

/// One structured unit parsed from a prefixed line of the response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub kind: RecordKind,
    pub content: RecordContent,
    pub session_id: Option<String>,
}

impl StreamRecord {
    pub fn text(content: impl Into<String>, session_id: Option<&str>) -> Self {
        Self {
            kind: RecordKind::Text,
            content: RecordContent::Text(content.into()),
            session_id: session_id.map(ToString::to_string),
        }
    }

    pub fn end(session_id: Option<&str>) -> Self {
        Self {
            kind: RecordKind::End,
            content: RecordContent::Text(String::new()),
            session_id: session_id.map(ToString::to_string),
        }
    }

    pub fn error(message: impl Into<String>, session_id: Option<&str>) -> Self {
        Self {
            kind: RecordKind::Error,
            content: RecordContent::Text(message.into()),
            session_id: session_id.map(ToString::to_string),
        }
    }

    /// Builds a record from a decoded JSON payload.
    ///
    /// Returns `None` for payloads without a known `type`. A missing or
    /// non-string `content` is read as empty text; a `sources` record keeps
    /// only entries carrying a `text` string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value
            .get("type")
            .and_then(|value| value.as_str())
            .and_then(RecordKind::parse)?;

        let content = match kind {
            RecordKind::Sources => RecordContent::Sources(
                value
                    .get("content")
                    .and_then(|value| value.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|item| item.get("text").and_then(|text| text.as_str()))
                            .map(|text| SourceItem {
                                text: text.to_owned(),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            ),
            _ => RecordContent::Text(
                value
                    .get("content")
                    .and_then(|value| value.as_str())
                    .unwrap_or("")
                    .to_owned(),
            ),
        };

        let session_id = value
            .get("session_id")
            .and_then(|value| value.as_str())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ToString::to_string);

        Some(Self {
            kind,
            content,
            session_id,
        })
    }
}
