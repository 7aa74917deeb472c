//! Window geometry primitives and viewport clamping.
//!
//! All values are CSS pixels. Clamping shrinks a box to the viewport first, so a
//! clamped box always lies fully inside the viewport.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Shrinks the size so it never exceeds the viewport.
    pub fn fit_within(self, viewport: Viewport) -> Self {
        Self {
            width: self.width.clamp(0.0, viewport.width),
            height: self.height.clamp(0.0, viewport.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_inside(&self, viewport: Viewport) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= viewport.width
            && self.bottom() <= viewport.height
    }
}

/// Clamp an origin so a box of `size` stays fully inside `viewport`.
pub fn clamp_origin(origin: Point, size: Size, viewport: Viewport) -> Point {
    let size = size.fit_within(viewport);
    let max_x = (viewport.width - size.width).max(0.0);
    let max_y = (viewport.height - size.height).max(0.0);
    let x = if origin.x.is_finite() { origin.x } else { 0.0 };
    let y = if origin.y.is_finite() { origin.y } else { 0.0 };
    Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Fixed window sizes per display mode. Maximized always fills the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePresets {
    /// Floating launcher shown while the window is closed.
    pub trigger: Size,
    /// Collapsed title bar.
    pub minimized: Size,
    pub normal: Size,
    /// Gap kept between the default position and the viewport's bottom-right corner.
    pub edge_margin: f64,
}

impl Default for SizePresets {
    fn default() -> Self {
        Self {
            trigger: Size::new(64.0, 64.0),
            minimized: Size::new(320.0, 56.0),
            normal: Size::new(380.0, 600.0),
            edge_margin: 20.0,
        }
    }
}

impl SizePresets {
    /// Bottom-right anchored origin for a box of `size`.
    pub fn default_origin(&self, size: Size, viewport: Viewport) -> Point {
        let size = size.fit_within(viewport);
        let origin = Point::new(
            viewport.width - size.width - self.edge_margin,
            viewport.height - size.height - self.edge_margin,
        );
        clamp_origin(origin, size, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_origin, Point, Rect, Size, SizePresets, Viewport};

    #[test]
    fn clamp_pulls_box_back_inside_every_edge() {
        let viewport = Viewport::new(1000.0, 800.0);
        let size = Size::new(300.0, 200.0);

        assert_eq!(clamp_origin(Point::new(-50.0, -10.0), size, viewport), Point::new(0.0, 0.0));
        assert_eq!(
            clamp_origin(Point::new(900.0, 700.0), size, viewport),
            Point::new(700.0, 600.0)
        );
        assert_eq!(
            clamp_origin(Point::new(120.0, 40.0), size, viewport),
            Point::new(120.0, 40.0)
        );
    }

    #[test]
    fn oversized_box_is_pinned_to_origin() {
        let viewport = Viewport::new(320.0, 480.0);
        let origin = clamp_origin(Point::new(50.0, 50.0), Size::new(380.0, 600.0), viewport);
        assert_eq!(origin, Point::new(0.0, 0.0));
    }

    #[test]
    fn non_finite_coordinates_clamp_to_zero() {
        let viewport = Viewport::new(500.0, 500.0);
        let origin = clamp_origin(Point::new(f64::NAN, f64::INFINITY), Size::new(10.0, 10.0), viewport);
        assert_eq!(origin, Point::new(0.0, 0.0));
    }

    #[test]
    fn default_origin_is_bottom_right_with_margin() {
        let presets = SizePresets::default();
        let viewport = Viewport::new(1280.0, 720.0);
        let origin = presets.default_origin(presets.normal, viewport);
        assert_eq!(origin, Point::new(1280.0 - 380.0 - 20.0, 720.0 - 600.0 - 20.0));

        let rect = Rect::from_origin_size(origin, presets.normal);
        assert!(rect.is_inside(viewport));
    }
}
