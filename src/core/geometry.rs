//! Points, sizes and rectangles in card-local units.
//!
//! The origin is the top-left corner of the card, `x` grows right and `y`
//! grows down.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate by an offset.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Straight-line interpolation from `self` (t = 0) to `to` (t = 1).
    #[must_use]
    pub fn lerp(self, to: Point, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Round a fractional extent to whole pixels (at least one each way).
    #[must_use]
    pub fn from_f32(width: f32, height: f32) -> Self {
        let px = |v: f32| if v.is_finite() { v.round().max(1.0) as u32 } else { 1 };
        Self::new(px(width), px(height))
    }

    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle given by its top-left corner and extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given extent centered on `center`.
    #[must_use]
    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whole-pixel size hint for resolving a bitmap to fill this rect.
    #[must_use]
    pub fn pixel_size(&self) -> Size {
        Size::from_f32(self.width, self.height)
    }

    /// Same rect with its width replaced, anchored on the left edge.
    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let r = Rect::centered(Point::new(50.0, 40.0), 20.0, 10.0);
        assert_eq!(r, Rect::new(40.0, 35.0, 20.0, 10.0));
        assert_eq!(r.center(), Point::new(50.0, 40.0));
        assert_eq!(r.right(), 60.0);
        assert_eq!(r.bottom(), 45.0);
    }

    #[test]
    fn test_point_lerp() {
        let a = Point::new(0.0, 100.0);
        let b = Point::new(100.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.25), Point::new(25.0, 75.0));
    }

    #[test]
    fn test_size_from_f32() {
        assert_eq!(Size::from_f32(27.2, 0.2), Size::new(27, 1));
        assert_eq!(Size::from_f32(f32::NAN, 3.6), Size::new(1, 4));
        assert_eq!(Size::new(3, 4).area(), 12);
        assert!(Size::new(0, 4).is_empty());
    }
}
