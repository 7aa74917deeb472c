//! Visible message list.
//!
//! Assistant turns start as empty placeholders, grow append-only while the
//! reply streams, then freeze as either final text or an error message.

use chat_stream::SourceItem;
use time::OffsetDateTime;

/// Locally unique message id, monotonic in creation order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MessageId(u64);

impl MessageId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    /// Assistant placeholder still receiving chunks.
    Streaming,
    Final,
    /// Replaced by a synthesized error message.
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub is_user: bool,
    pub timestamp: OffsetDateTime,
    pub sources: Vec<SourceItem>,
    pub status: MessageStatus,
}

impl Message {
    pub fn is_streaming(&self) -> bool {
        self.status == MessageStatus::Streaming
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(content.into(), true, MessageStatus::Final)
    }

    /// Appends a finished assistant-side message, e.g. a greeting.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> MessageId {
        self.push(content.into(), false, MessageStatus::Final)
    }

    pub fn push_placeholder(&mut self) -> MessageId {
        self.push(String::new(), false, MessageStatus::Streaming)
    }

    pub fn append_chunk(&mut self, id: MessageId, delta: &str) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.content.push_str(delta);
                true
            }
            None => false,
        }
    }

    pub fn set_sources(&mut self, id: MessageId, sources: &[SourceItem]) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.sources = sources.to_vec();
                true
            }
            None => false,
        }
    }

    /// Freezes a placeholder with its final content.
    pub fn finalize(&mut self, id: MessageId, content: &str) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.content = content.to_owned();
                message.status = MessageStatus::Final;
                true
            }
            None => false,
        }
    }

    /// Replaces a placeholder's content wholesale with an error message.
    pub fn replace_with_error(&mut self, id: MessageId, content: impl Into<String>) -> bool {
        match self.streaming_mut(id) {
            Some(message) => {
                message.content = content.into();
                message.sources.clear();
                message.status = MessageStatus::Error;
                true
            }
            None => false,
        }
    }

    pub fn is_unresolved(&self, id: MessageId) -> bool {
        self.get(id).is_some_and(Message::is_streaming)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn push(&mut self, content: String, is_user: bool, status: MessageStatus) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            content,
            is_user,
            timestamp: OffsetDateTime::now_utc(),
            sources: Vec::new(),
            status,
        });
        id
    }

    fn streaming_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages
            .iter_mut()
            .rev()
            .find(|message| message.id == id)
            .filter(|message| message.is_streaming())
    }
}
