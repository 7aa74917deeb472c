//! Seam between the widget and whatever carries an exchange.

use chat_stream::{ChatStreamClient, ChatStreamError, ExchangeHandler};

/// Carries one message to the backend and streams the reply into `handler`.
///
/// Implementations are expected to call exactly one of `on_complete` or
/// `on_error` before returning; the widget still resolves the placeholder from
/// the returned result when they don't.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    async fn send<H>(&mut self, message: &str, handler: &mut H) -> Result<String, ChatStreamError>
    where
        H: ExchangeHandler + ?Sized;

    /// Session id adopted from the backend, if any.
    fn session_id(&self) -> Option<&str> {
        None
    }
}

impl ChatTransport for ChatStreamClient {
    async fn send<H>(&mut self, message: &str, handler: &mut H) -> Result<String, ChatStreamError>
    where
        H: ExchangeHandler + ?Sized,
    {
        ChatStreamClient::send(self, message, handler).await
    }

    fn session_id(&self) -> Option<&str> {
        ChatStreamClient::session_id(self)
    }
}
