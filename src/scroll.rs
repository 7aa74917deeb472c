//! Scroll affordance thresholds.

/// Scroll position of the transcript container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub offset: f64,
    /// Full height of the transcript content.
    pub content_height: f64,
    /// Visible height of the scrolling container.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(offset: f64, content_height: f64, viewport_height: f64) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    pub fn distance_from_top(&self) -> f64 {
        self.offset.max(0.0)
    }

    pub fn distance_from_bottom(&self) -> f64 {
        (self.content_height - self.viewport_height - self.offset).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordancePolicy {
    /// Distance from an edge still considered "at" that edge. Generous so
    /// sub-pixel scroll jitter never toggles a button.
    pub edge_tolerance: f64,
    /// Affordances stay hidden until the transcript holds more messages than this.
    pub min_messages: usize,
}

impl Default for AffordancePolicy {
    fn default() -> Self {
        Self {
            edge_tolerance: 150.0,
            min_messages: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollAffordanceState {
    pub show_jump_to_latest: bool,
    pub show_jump_to_oldest: bool,
}

impl AffordancePolicy {
    pub fn is_near_top(&self, metrics: &ScrollMetrics) -> bool {
        metrics.distance_from_top() <= self.edge_tolerance
    }

    pub fn is_near_bottom(&self, metrics: &ScrollMetrics) -> bool {
        metrics.distance_from_bottom() <= self.edge_tolerance
    }

    pub fn evaluate(&self, metrics: &ScrollMetrics, message_count: usize) -> ScrollAffordanceState {
        if message_count <= self.min_messages {
            return ScrollAffordanceState::default();
        }
        ScrollAffordanceState {
            show_jump_to_latest: !self.is_near_bottom(metrics),
            show_jump_to_oldest: !self.is_near_top(metrics),
        }
    }
}
