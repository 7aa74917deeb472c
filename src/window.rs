//! Floating window state machine.
//!
//! Invariants:
//! - The window rectangle lies inside the viewport after every public call.
//! - `minimized` and `maximized` are never both set.
//! - Size comes only from [`SizePresets`] via mode transitions.
//! - Drag positions are coalesced; at most one origin update lands per animation frame.

use crate::geometry::{clamp_origin, Point, Rect, Size, SizePresets, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Closed,
    Normal,
    Minimized,
    Maximized,
}

impl WindowMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Snapshot of window placement and flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub rect: Rect,
    pub closed: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub dragging: bool,
}

/// Fixed chrome measurements used to place the scroll affordance buttons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordanceLayout {
    pub button_size: f64,
    pub inset: f64,
    pub header_height: f64,
    pub footer_height: f64,
}

impl Default for AffordanceLayout {
    fn default() -> Self {
        Self {
            button_size: 36.0,
            inset: 16.0,
            header_height: 56.0,
            footer_height: 72.0,
        }
    }
}

/// Viewport positions of the two scroll affordance buttons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordanceAnchors {
    pub jump_to_latest: Point,
    pub jump_to_oldest: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    pointer_offset: Point,
}

#[derive(Debug, Clone)]
pub struct WindowController {
    viewport: Viewport,
    presets: SizePresets,
    affordance_layout: AffordanceLayout,
    mode: WindowMode,
    origin: Point,
    restore_origin: Point,
    drag: Option<DragState>,
    pending_origin: Option<Point>,
    revision: u64,
}

impl WindowController {
    /// Creates an open window at the default bottom-right position.
    pub fn new(viewport: Viewport, presets: SizePresets) -> Self {
        let origin = presets.default_origin(presets.normal, viewport);
        Self {
            viewport,
            presets,
            affordance_layout: AffordanceLayout::default(),
            mode: WindowMode::Normal,
            origin,
            restore_origin: origin,
            drag: None,
            pending_origin: None,
            revision: 0,
        }
    }

    pub fn with_affordance_layout(mut self, layout: AffordanceLayout) -> Self {
        self.affordance_layout = layout;
        self
    }

    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Bumped on every geometry change; consumers recompute derived layout when it moves.
    pub fn geometry_revision(&self) -> u64 {
        self.revision
    }

    pub fn size(&self) -> Size {
        let size = match self.mode {
            WindowMode::Closed => self.presets.trigger,
            WindowMode::Minimized => self.presets.minimized,
            WindowMode::Normal => self.presets.normal,
            WindowMode::Maximized => Size::new(self.viewport.width, self.viewport.height),
        };
        size.fit_within(self.viewport)
    }

    pub fn geometry(&self) -> WindowGeometry {
        let origin = match self.mode {
            WindowMode::Maximized => Point::new(0.0, 0.0),
            _ => self.origin,
        };
        WindowGeometry {
            rect: Rect::from_origin_size(origin, self.size()),
            closed: self.mode == WindowMode::Closed,
            minimized: self.mode == WindowMode::Minimized,
            maximized: self.mode == WindowMode::Maximized,
            dragging: self.drag.is_some(),
        }
    }

    /// Reopens a closed window at the default position for the current viewport.
    pub fn open(&mut self) -> bool {
        if self.mode.is_open() {
            return false;
        }
        self.mode = WindowMode::Normal;
        self.origin = self.presets.default_origin(self.presets.normal, self.viewport);
        self.restore_origin = self.origin;
        self.end_drag();
        self.bump();
        true
    }

    pub fn close(&mut self) -> bool {
        if !self.mode.is_open() {
            return false;
        }
        self.mode = WindowMode::Closed;
        self.end_drag();
        self.origin = self.presets.default_origin(self.presets.trigger, self.viewport);
        self.bump();
        true
    }

    pub fn toggle_minimize(&mut self) -> bool {
        let next = match self.mode {
            WindowMode::Closed => return false,
            WindowMode::Minimized => WindowMode::Normal,
            WindowMode::Maximized => {
                self.origin = self.restore_origin;
                WindowMode::Minimized
            }
            WindowMode::Normal => WindowMode::Minimized,
        };
        self.end_drag();
        self.mode = next;
        self.reclamp();
        self.bump();
        true
    }

    pub fn toggle_maximize(&mut self) -> bool {
        match self.mode {
            WindowMode::Closed => return false,
            WindowMode::Maximized => {
                self.mode = WindowMode::Normal;
                self.origin = self.restore_origin;
            }
            WindowMode::Normal | WindowMode::Minimized => {
                self.end_drag();
                self.restore_origin = self.origin;
                self.mode = WindowMode::Maximized;
            }
        }
        self.reclamp();
        self.bump();
        true
    }

    /// Starts a drag when the pointer goes down on the header of a movable window.
    pub fn pointer_down(&mut self, pointer: Point, on_header: bool) -> bool {
        if !on_header || !matches!(self.mode, WindowMode::Normal | WindowMode::Minimized) {
            return false;
        }
        self.drag = Some(DragState {
            pointer_offset: Point::new(pointer.x - self.origin.x, pointer.y - self.origin.y),
        });
        self.pending_origin = None;
        self.bump();
        true
    }

    /// Records the latest drag target. Returns `true` when an animation frame
    /// should be requested to apply it.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag else {
            return false;
        };
        let target = Point::new(
            pointer.x - drag.pointer_offset.x,
            pointer.y - drag.pointer_offset.y,
        );
        self.pending_origin = Some(clamp_origin(target, self.size(), self.viewport));
        true
    }

    pub fn needs_animation_frame(&self) -> bool {
        self.pending_origin.is_some()
    }

    /// Applies the coalesced drag position. Returns whether the origin moved.
    pub fn on_animation_frame(&mut self) -> bool {
        let Some(next) = self.pending_origin.take() else {
            return false;
        };
        if next == self.origin {
            return false;
        }
        self.origin = next;
        self.bump();
        true
    }

    /// Ends a drag, landing any position still waiting for a frame.
    pub fn pointer_up(&mut self) -> bool {
        if self.drag.is_none() {
            return false;
        }
        self.on_animation_frame();
        self.drag = None;
        self.bump();
        true
    }

    /// Re-clamps the window against a new viewport in every mode.
    pub fn resize_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reclamp();
        self.restore_origin = clamp_origin(self.restore_origin, self.presets.normal, viewport);
        if let Some(pending) = self.pending_origin {
            self.pending_origin = Some(clamp_origin(pending, self.size(), viewport));
        }
        self.bump();
    }

    /// Button positions derived from the window rectangle, or `None` while the
    /// transcript is hidden.
    pub fn affordance_anchors(&self) -> Option<AffordanceAnchors> {
        if !matches!(self.mode, WindowMode::Normal | WindowMode::Maximized) {
            return None;
        }
        let rect = self.geometry().rect;
        let layout = self.affordance_layout;
        let x = (rect.right() - layout.inset - layout.button_size).max(rect.x);
        let latest_y = (rect.bottom() - layout.footer_height - layout.inset - layout.button_size)
            .max(rect.y);
        let oldest_y = (rect.y + layout.header_height + layout.inset).min(latest_y);
        Some(AffordanceAnchors {
            jump_to_latest: Point::new(x, latest_y),
            jump_to_oldest: Point::new(x, oldest_y),
        })
    }

    fn end_drag(&mut self) {
        self.drag = None;
        self.pending_origin = None;
    }

    fn reclamp(&mut self) {
        self.origin = clamp_origin(self.origin, self.size(), self.viewport);
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
