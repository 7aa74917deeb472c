//! Per-exchange state machine.
//!
//! `Idle -> Sending -> Streaming -> {Completed | Failed}`. Terminal phases
//! swallow every later record, so the caller observes at most one terminal
//! transition per exchange.

use crate::events::{RecordContent, RecordKind, SourceItem, StreamRecord};
use crate::session::SessionSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    Sending,
    Streaming,
    Completed,
    Failed,
}

impl ExchangePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Observable effect of applying a record or failure to an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeTransition {
    Chunk(String),
    Sources(Vec<SourceItem>),
    Complete(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct Exchange {
    phase: ExchangePhase,
    text: String,
    sources: Vec<SourceItem>,
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}

impl Exchange {
    pub fn new() -> Self {
        Self {
            phase: ExchangePhase::Idle,
            text: String::new(),
            sources: Vec::new(),
        }
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn accumulated_text(&self) -> &str {
        &self.text
    }

    pub fn sources(&self) -> &[SourceItem] {
        &self.sources
    }

    /// Marks the request as dispatched. Only valid from `Idle`.
    pub fn begin(&mut self) -> bool {
        if self.phase != ExchangePhase::Idle {
            return false;
        }
        self.phase = ExchangePhase::Sending;
        true
    }

    /// Applies one decoded record, adopting its session id when the slot is empty.
    pub fn apply(
        &mut self,
        record: StreamRecord,
        session: &mut SessionSlot,
    ) -> Option<ExchangeTransition> {
        if self.phase.is_terminal() {
            return None;
        }

        if let Some(session_id) = record.session_id.as_deref() {
            session.adopt(session_id);
        }
        self.phase = ExchangePhase::Streaming;

        match (record.kind, record.content) {
            (RecordKind::Text, content) => {
                let delta = content.as_text().to_owned();
                self.text.push_str(&delta);
                Some(ExchangeTransition::Chunk(delta))
            }
            (RecordKind::Sources, RecordContent::Sources(items)) => {
                self.sources = items.clone();
                Some(ExchangeTransition::Sources(items))
            }
            (RecordKind::Sources, RecordContent::Text(_)) | (RecordKind::Session, _) => None,
            (RecordKind::End, _) => {
                self.phase = ExchangePhase::Completed;
                Some(ExchangeTransition::Complete(self.text.clone()))
            }
            (RecordKind::Error, content) => {
                self.phase = ExchangePhase::Failed;
                Some(ExchangeTransition::Error(content.as_text().to_owned()))
            }
        }
    }

    /// Fails the exchange from outside the record stream (transport errors,
    /// premature end of body). No-op once terminal.
    pub fn fail(&mut self, message: impl Into<String>) -> Option<ExchangeTransition> {
        if self.phase.is_terminal() {
            return None;
        }
        self.phase = ExchangePhase::Failed;
        Some(ExchangeTransition::Error(message.into()))
    }
}
