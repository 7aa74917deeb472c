use std::fmt;

use futures_util::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};

use crate::config::ChatStreamConfig;
use crate::error::{parse_error_message, ChatStreamError};
use crate::events::SourceItem;
use crate::exchange::{Exchange, ExchangeTransition};
use crate::headers::build_headers;
use crate::parser::RecordLineParser;
use crate::payload::ChatRequest;
use crate::session::SessionSlot;
use crate::url::normalize_chat_url;

/// Receiver for the observable transitions of one exchange.
///
/// For every exchange, `on_chunk` fires once per `text` record in arrival
/// order, then exactly one of `on_complete` or `on_error` fires last.
pub trait ExchangeHandler {
    fn on_chunk(&mut self, delta: &str);

    fn on_sources(&mut self, _sources: &[SourceItem]) {}

    fn on_complete(&mut self, full_text: &str);

    fn on_error(&mut self, message: &str);
}

/// HTTP transport for chat exchanges.
///
/// `send` borrows the client mutably, so one instance never has two exchanges
/// in flight.
#[derive(Debug)]
pub struct ChatStreamClient {
    http: Client,
    config: ChatStreamConfig,
    session: SessionSlot,
}

impl ChatStreamClient {
    pub fn new(config: ChatStreamConfig) -> Result<Self, ChatStreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatStreamError::from)?;
        Ok(Self {
            http,
            config,
            session: SessionSlot::new(),
        })
    }

    pub fn config(&self) -> &ChatStreamConfig {
        &self.config
    }

    /// Session id adopted from an earlier exchange, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session.get()
    }

    pub fn endpoint(&self) -> String {
        normalize_chat_url(&self.config.base_url, &self.config.endpoint)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ChatStreamError> {
        let headers = build_headers(&self.config)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    ChatStreamError::InvalidHeader(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    ChatStreamError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(&self, message: &str) -> Result<reqwest::RequestBuilder, ChatStreamError> {
        let endpoint = self.endpoint();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|error| ChatStreamError::InvalidUrl(format!("{endpoint}: {error}")))?;
        let payload = ChatRequest::new(message, self.session.get().map(ToString::to_string));
        Ok(self
            .http
            .post(url)
            .headers(self.build_headers()?)
            .json(&payload))
    }

    /// Runs one exchange and resolves with the full assistant text.
    ///
    /// Every failure (empty input, transport, HTTP status, backend `error`
    /// record, premature end of body) reaches `handler.on_error` exactly once
    /// before the error is returned.
    pub async fn send<H>(&mut self, message: &str, handler: &mut H) -> Result<String, ChatStreamError>
    where
        H: ExchangeHandler + ?Sized,
    {
        let mut exchange = Exchange::new();
        exchange.begin();

        let outcome = match self.open(message).await {
            Ok(response) => {
                let mut parser = RecordLineParser::new(self.config.record_prefix.clone());
                read_records(
                    response.bytes_stream(),
                    &mut parser,
                    &mut exchange,
                    &mut self.session,
                    handler,
                )
                .await
            }
            Err(error) => Err(error),
        };

        settle(&mut exchange, outcome, handler)
    }

    async fn open(&self, message: &str) -> Result<Response, ChatStreamError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatStreamError::EmptyMessage);
        }

        tracing::debug!(
            endpoint = %self.endpoint(),
            session_id = self.session.get(),
            "opening chat exchange"
        );
        let response = self.build_request(message)?.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ChatStreamError::Status(
            status,
            parse_error_message(status, &body),
        ))
    }
}

/// Drives one exchange over an arbitrary byte stream.
///
/// Chunk boundaries never change the dispatched records. This is the same loop
/// `ChatStreamClient::send` runs over the HTTP body.
pub async fn consume_byte_stream<S, B, E, H>(
    stream: S,
    record_prefix: &str,
    session: &mut SessionSlot,
    handler: &mut H,
) -> Result<String, ChatStreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
    H: ExchangeHandler + ?Sized,
{
    let mut exchange = Exchange::new();
    exchange.begin();
    let mut parser = RecordLineParser::new(record_prefix);
    let outcome = read_records(stream, &mut parser, &mut exchange, session, handler).await;
    settle(&mut exchange, outcome, handler)
}

async fn read_records<S, B, E, H>(
    stream: S,
    parser: &mut RecordLineParser,
    exchange: &mut Exchange,
    session: &mut SessionSlot,
    handler: &mut H,
) -> Result<String, ChatStreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
    H: ExchangeHandler + ?Sized,
{
    let mut stream = std::pin::pin!(stream);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|error| ChatStreamError::Body(error.to_string()))?;
        for record in parser.feed(chunk.as_ref()) {
            if let Some(outcome) = apply_record(exchange, record, session, handler) {
                return outcome;
            }
        }
    }

    if let Some(record) = parser.finish() {
        if let Some(outcome) = apply_record(exchange, record, session, handler) {
            return outcome;
        }
    }

    Err(ChatStreamError::Incomplete)
}

fn apply_record<H>(
    exchange: &mut Exchange,
    record: crate::events::StreamRecord,
    session: &mut SessionSlot,
    handler: &mut H,
) -> Option<Result<String, ChatStreamError>>
where
    H: ExchangeHandler + ?Sized,
{
    let transition = exchange.apply(record, session)?;
    dispatch(transition, handler)
}

fn dispatch<H>(
    transition: ExchangeTransition,
    handler: &mut H,
) -> Option<Result<String, ChatStreamError>>
where
    H: ExchangeHandler + ?Sized,
{
    match transition {
        ExchangeTransition::Chunk(delta) => {
            handler.on_chunk(&delta);
            None
        }
        ExchangeTransition::Sources(items) => {
            handler.on_sources(&items);
            None
        }
        ExchangeTransition::Complete(text) => {
            handler.on_complete(&text);
            Some(Ok(text))
        }
        ExchangeTransition::Error(message) => {
            handler.on_error(&message);
            Some(Err(ChatStreamError::Protocol(message)))
        }
    }
}

// Routes failures that did not come from a record through the exchange so the
// handler still sees exactly one terminal callback.
fn settle<H>(
    exchange: &mut Exchange,
    outcome: Result<String, ChatStreamError>,
    handler: &mut H,
) -> Result<String, ChatStreamError>
where
    H: ExchangeHandler + ?Sized,
{
    if let Err(error) = &outcome {
        tracing::error!(%error, "chat exchange failed");
        if let Some(ExchangeTransition::Error(message)) = exchange.fail(error.user_message()) {
            handler.on_error(&message);
        }
    }
    outcome
}
