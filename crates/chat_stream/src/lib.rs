//! Streaming transport for the chat widget backend.
//!
//! This crate owns one request/response exchange with the inference backend:
//! building the request, decoding the newline-delimited record stream as bytes
//! arrive, and dispatching text deltas and a single terminal outcome to a
//! caller-supplied [`ExchangeHandler`]. It holds no transcript or window state;
//! the only thing carried between exchanges is the adopted session id.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod exchange;
pub mod headers;
pub mod parser;
pub mod payload;
pub mod session;
pub mod url;

pub use client::{consume_byte_stream, ChatStreamClient, ExchangeHandler};
pub use config::ChatStreamConfig;
pub use error::ChatStreamError;
pub use events::{RecordContent, RecordKind, SourceItem, StreamRecord};
pub use exchange::{Exchange, ExchangePhase, ExchangeTransition};
pub use parser::RecordLineParser;
pub use payload::ChatRequest;
pub use session::SessionSlot;
pub use url::normalize_chat_url;

pub use reqwest::StatusCode;
