//! The chat widget: transcript, window and scroll affordances composed around
//! one in-flight exchange at a time.
//!
//! The widget never reads a clock. Hosts pass `now` into the scroll entry
//! points and call [`ChatWidget::poll`] from their frame or timer loop; `poll`
//! returns the side effects the host should apply.

use std::time::{Duration, Instant};

use chat_stream::{ChatStreamError, ExchangeHandler, SourceItem};
use thiserror::Error;

use crate::auth::AuthCapability;
use crate::config::WidgetConfig;
use crate::debounce::Debouncer;
use crate::geometry::{SizePresets, Viewport};
use crate::scroll::{AffordancePolicy, ScrollAffordanceState, ScrollMetrics};
use crate::transcript::{MessageId, Transcript};
use crate::transport::ChatTransport;
use crate::window::{AffordanceAnchors, WindowController};

/// Why a submission was refused before any request was made.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("login required before chatting")]
    NotAuthenticated,
    #[error("a reply is still streaming")]
    InputDisabled,
    #[error("message is empty")]
    EmptyMessage,
}

/// Host-visible side effect produced by [`ChatWidget::poll`] or a jump action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEffect {
    ScrollToBottom { smooth: bool },
    ScrollToTop { smooth: bool },
    AffordancesChanged(ScrollAffordanceState),
    AnchorsChanged(Option<AffordanceAnchors>),
}

/// How an accepted submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Completed(String),
    /// The placeholder now holds this apology text.
    Failed(String),
}

/// Ticket for an accepted submission. Must be handed back to
/// [`ChatWidget::finish_submit`] to re-enable input.
#[derive(Debug)]
#[must_use = "input stays disabled until the reply is finished"]
pub struct PendingReply {
    message: String,
    user: MessageId,
    placeholder: MessageId,
}

impl PendingReply {
    /// Trimmed text that was appended to the transcript.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_message_id(&self) -> MessageId {
        self.user
    }

    pub fn placeholder_id(&self) -> MessageId {
        self.placeholder
    }
}

/// Exchange callbacks bound to one assistant placeholder.
pub struct ReplySink<'a> {
    transcript: &'a mut Transcript,
    scroll_requested: &'a mut bool,
    placeholder: MessageId,
    fallback_contact: &'a str,
}

impl ExchangeHandler for ReplySink<'_> {
    fn on_chunk(&mut self, delta: &str) {
        if self.transcript.append_chunk(self.placeholder, delta) {
            *self.scroll_requested = true;
        }
    }

    fn on_sources(&mut self, sources: &[SourceItem]) {
        self.transcript.set_sources(self.placeholder, sources);
    }

    fn on_complete(&mut self, full_text: &str) {
        if self.transcript.finalize(self.placeholder, full_text) {
            *self.scroll_requested = true;
        }
    }

    fn on_error(&mut self, message: &str) {
        let text = apology(message, self.fallback_contact);
        if self.transcript.replace_with_error(self.placeholder, text) {
            *self.scroll_requested = true;
        }
    }
}

/// Apology shown in place of a failed reply.
pub fn apology(error: &str, fallback_contact: &str) -> String {
    let error = error.trim().trim_end_matches('.');
    format!(
        "Sorry, something went wrong: {error}. Please try again later or contact us at {fallback_contact}."
    )
}

#[derive(Debug)]
pub struct ChatWidget {
    window: WindowController,
    transcript: Transcript,
    policy: AffordancePolicy,
    affordances: ScrollAffordanceState,
    affordances_dirty: bool,
    metrics: ScrollMetrics,
    scroll_observer: Debouncer,
    scroll_to_bottom: Debouncer,
    scroll_requested: bool,
    in_flight: Option<MessageId>,
    anchors_revision: u64,
    fallback_contact: String,
}

impl ChatWidget {
    pub fn new(viewport: Viewport, config: &WidgetConfig) -> Self {
        Self::with_presets(viewport, SizePresets::default(), config)
    }

    pub fn with_presets(viewport: Viewport, presets: SizePresets, config: &WidgetConfig) -> Self {
        let window = WindowController::new(viewport, presets);
        let anchors_revision = window.geometry_revision();
        let mut transcript = Transcript::new();
        if let Some(greeting) = &config.greeting {
            transcript.push_assistant(greeting.clone());
        }

        Self {
            window,
            transcript,
            policy: AffordancePolicy::default(),
            affordances: ScrollAffordanceState::default(),
            affordances_dirty: false,
            metrics: ScrollMetrics::default(),
            scroll_observer: Debouncer::new(config.scroll_debounce),
            scroll_to_bottom: Debouncer::new(config.scroll_to_bottom_delay),
            scroll_requested: false,
            in_flight: None,
            anchors_revision,
            fallback_contact: config.fallback_contact.clone(),
        }
    }

    pub fn with_affordance_policy(mut self, policy: AffordancePolicy) -> Self {
        self.policy = policy;
        self.recompute_affordances();
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn window(&self) -> &WindowController {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut WindowController {
        &mut self.window
    }

    pub fn affordances(&self) -> ScrollAffordanceState {
        self.affordances
    }

    /// Whether a reply is still streaming. Does not consult the login gate;
    /// see [`ChatWidget::is_input_disabled_for`].
    pub fn is_input_disabled(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the input box should be greyed out for this user.
    pub fn is_input_disabled_for<A>(&self, auth: &A) -> bool
    where
        A: AuthCapability + ?Sized,
    {
        self.is_input_disabled() || !auth.is_authenticated()
    }

    /// Validates and records a submission.
    ///
    /// On success the user message and an empty assistant placeholder are in
    /// the transcript and input is disabled until `finish_submit`.
    pub fn begin_submit<A>(&mut self, input: &str, auth: &A) -> Result<PendingReply, SubmitRejected>
    where
        A: AuthCapability + ?Sized,
    {
        if !auth.is_authenticated() {
            tracing::debug!("submission blocked, requesting login");
            auth.request_login();
            return Err(SubmitRejected::NotAuthenticated);
        }
        if self.in_flight.is_some() {
            return Err(SubmitRejected::InputDisabled);
        }
        let message = input.trim();
        if message.is_empty() {
            return Err(SubmitRejected::EmptyMessage);
        }

        let user = self.transcript.push_user(message);
        let placeholder = self.transcript.push_placeholder();
        self.in_flight = Some(placeholder);
        self.scroll_requested = true;
        self.recompute_affordances();
        tracing::debug!(placeholder = placeholder.raw(), "submission accepted");

        Ok(PendingReply {
            message: message.to_owned(),
            user,
            placeholder,
        })
    }

    /// Handler that streams into the pending reply's placeholder.
    pub fn reply_sink(&mut self, pending: &PendingReply) -> ReplySink<'_> {
        ReplySink {
            transcript: &mut self.transcript,
            scroll_requested: &mut self.scroll_requested,
            placeholder: pending.placeholder,
            fallback_contact: &self.fallback_contact,
        }
    }

    /// Resolves the placeholder if the transport never did, then re-enables input.
    pub fn finish_submit(
        &mut self,
        pending: PendingReply,
        result: Result<String, ChatStreamError>,
    ) -> ReplyOutcome {
        let placeholder = pending.placeholder;
        if self.transcript.is_unresolved(placeholder) {
            match &result {
                Ok(text) => {
                    self.transcript.finalize(placeholder, text);
                }
                Err(error) => {
                    // The transport returned without reporting; nothing upstream logged it.
                    tracing::error!(%error, "chat exchange failed");
                    let text = apology(&error.user_message(), &self.fallback_contact);
                    self.transcript.replace_with_error(placeholder, text);
                }
            }
        }
        if self.in_flight == Some(placeholder) {
            self.in_flight = None;
        }
        self.scroll_requested = true;

        match result {
            Ok(text) => ReplyOutcome::Completed(text),
            Err(_) => {
                let content = self
                    .transcript
                    .get(placeholder)
                    .map(|message| message.content.clone())
                    .unwrap_or_default();
                ReplyOutcome::Failed(content)
            }
        }
    }

    /// Runs a whole submission over `transport`.
    pub async fn submit<T, A>(
        &mut self,
        transport: &mut T,
        auth: &A,
        input: &str,
    ) -> Result<ReplyOutcome, SubmitRejected>
    where
        T: ChatTransport + ?Sized,
        A: AuthCapability + ?Sized,
    {
        let pending = self.begin_submit(input, auth)?;
        let result = {
            let mut sink = self.reply_sink(&pending);
            transport.send(pending.message(), &mut sink).await
        };
        Ok(self.finish_submit(pending, result))
    }

    /// Records a scroll event; affordances are re-evaluated once scrolling
    /// has been quiet for the debounce window.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: Instant) {
        self.metrics = metrics;
        self.scroll_observer.schedule(now);
    }

    /// Records new content dimensions and re-evaluates affordances immediately.
    pub fn on_content_metrics(&mut self, metrics: ScrollMetrics) {
        self.metrics = metrics;
        self.recompute_affordances();
    }

    pub fn jump_to_latest(&mut self) -> WidgetEffect {
        self.scroll_to_bottom.cancel();
        self.scroll_requested = false;
        WidgetEffect::ScrollToBottom { smooth: true }
    }

    pub fn jump_to_oldest(&mut self) -> WidgetEffect {
        WidgetEffect::ScrollToTop { smooth: true }
    }

    /// Advances timers to `now` and drains pending effects.
    pub fn poll(&mut self, now: Instant) -> Vec<WidgetEffect> {
        let mut effects = Vec::new();

        if std::mem::take(&mut self.scroll_requested) {
            // Streaming keeps requesting; an armed timer is not pushed back.
            self.scroll_to_bottom.schedule_if_idle(now);
        }
        if self.scroll_to_bottom.fire_if_due(now) {
            effects.push(WidgetEffect::ScrollToBottom { smooth: true });
        }
        if self.scroll_observer.fire_if_due(now) {
            self.recompute_affordances();
        }
        if std::mem::take(&mut self.affordances_dirty) {
            effects.push(WidgetEffect::AffordancesChanged(self.affordances));
        }

        let revision = self.window.geometry_revision();
        if revision != self.anchors_revision {
            self.anchors_revision = revision;
            effects.push(WidgetEffect::AnchorsChanged(self.window.affordance_anchors()));
        }

        effects
    }

    /// Time until the next timer fires, for hosts that sleep between polls.
    pub fn next_timeout(&self, now: Instant) -> Option<Duration> {
        // A pending request only arms an idle timer; an armed one keeps its deadline.
        let scroll_to_bottom = match self.scroll_to_bottom.next_timeout(now) {
            Some(remaining) => Some(remaining),
            None if self.scroll_requested => Some(self.scroll_to_bottom.window()),
            None => None,
        };
        match (scroll_to_bottom, self.scroll_observer.next_timeout(now)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn recompute_affordances(&mut self) {
        let next = self.policy.evaluate(&self.metrics, self.transcript.len());
        if next != self.affordances {
            self.affordances = next;
            self.affordances_dirty = true;
        }
    }
}
