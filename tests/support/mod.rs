#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use chat_stream::{
    consume_byte_stream, ChatStreamError, ExchangeHandler, SessionSlot, StatusCode,
};
use chat_widget::ChatTransport;
use futures_util::stream;

/// One canned backend response.
pub enum Script {
    /// Record stream delivered in the given chunks.
    Body(Vec<Vec<u8>>),
    /// Non-success status, reported through `on_error` like the HTTP client does.
    Status(u16, String),
    /// Failure returned without touching the handler.
    Silent(ChatStreamError),
}

/// In-memory transport that replays scripts through the real record decoder.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: VecDeque<Script>,
    session: SessionSlot,
    pub sent: Vec<String>,
}

impl ScriptedTransport {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: scripts.into(),
            ..Self::default()
        }
    }
}

impl ChatTransport for ScriptedTransport {
    async fn send<H>(&mut self, message: &str, handler: &mut H) -> Result<String, ChatStreamError>
    where
        H: ExchangeHandler + ?Sized,
    {
        self.sent.push(message.to_owned());
        match self.scripts.pop_front() {
            Some(Script::Body(chunks)) => {
                let items = chunks.into_iter().map(Ok::<_, Infallible>);
                consume_byte_stream(stream::iter(items), "data:", &mut self.session, handler).await
            }
            Some(Script::Status(code, message)) => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let error = ChatStreamError::Status(status, message);
                handler.on_error(&error.user_message());
                Err(error)
            }
            Some(Script::Silent(error)) => Err(error),
            None => panic!("no scripted response left for {message:?}"),
        }
    }

    fn session_id(&self) -> Option<&str> {
        self.session.get()
    }
}

pub fn record_body(payloads: &[&str]) -> Vec<u8> {
    payloads
        .iter()
        .map(|payload| format!("data: {payload}\n\n"))
        .collect::<String>()
        .into_bytes()
}

pub fn text_reply(session_id: &str, deltas: &[&str]) -> Vec<u8> {
    let mut lines: Vec<String> = deltas
        .iter()
        .map(|delta| {
            serde_json::json!({"type": "text", "content": delta, "session_id": session_id})
                .to_string()
        })
        .collect();
    lines.push(
        serde_json::json!({"type": "end", "content": "", "session_id": session_id}).to_string(),
    );
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    record_body(&refs)
}

/// Small deterministic generator for sweeps.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform-ish value in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * (self.next_u32() as f64 / u32::MAX as f64)
    }
}
