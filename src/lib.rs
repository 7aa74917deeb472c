//! Embeddable streaming chat widget.
//!
//! [`ChatWidget`] owns the transcript, the floating window state machine and
//! the scroll affordances. Replies stream in over a [`ChatTransport`], normally
//! [`chat_stream::ChatStreamClient`]; at most one exchange is in flight and
//! input stays disabled until it resolves.
//!
//! The widget does no rendering and reads no clock. Hosts feed pointer,
//! viewport and scroll events in, call [`ChatWidget::poll`] with the current
//! instant, and apply the returned [`WidgetEffect`]s.

pub mod auth;
pub mod config;
pub mod debounce;
pub mod geometry;
pub mod logging;
pub mod scroll;
pub mod transcript;
pub mod transport;
pub mod widget;
pub mod window;

pub use auth::{AuthCapability, StaticAuth};
pub use config::{ConfigError, WidgetConfig};
pub use debounce::Debouncer;
pub use geometry::{clamp_origin, Point, Rect, Size, SizePresets, Viewport};
pub use logging::init_logging;
pub use scroll::{AffordancePolicy, ScrollAffordanceState, ScrollMetrics};
pub use transcript::{Message, MessageId, MessageStatus, Transcript};
pub use transport::ChatTransport;
pub use widget::{
    apology, ChatWidget, PendingReply, ReplyOutcome, ReplySink, SubmitRejected, WidgetEffect,
};
pub use window::{
    AffordanceAnchors, AffordanceLayout, WindowController, WindowGeometry, WindowMode,
};
