use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in world units, stored as its two corners.
/// `min` is the top-left corner (Y-down), `max` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            min: Vec2::new(left, top),
            max: Vec2::new(right, bottom),
        }
    }

    /// Rectangle of the given size centered on `center`.
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn x(&self) -> f32 {
        self.min.x
    }

    pub fn y(&self) -> f32 {
        self.min.y
    }

    pub fn x2(&self) -> f32 {
        self.max.x
    }

    pub fn y2(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// The same rectangle translated by `delta`.
    pub fn offset(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// The same-sized rectangle recentered on `center`.
    pub fn moved_to(&self, center: Vec2) -> Self {
        Self::from_center(center, self.size())
    }

    /// Pixel rectangle with each edge truncated toward zero.
    pub fn to_pixels(&self) -> IRect {
        IRect {
            min: self.min.as_ivec2(),
            max: self.max.as_ivec2(),
        }
    }
}

/// Integer pixel rectangle handed to drawables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl IRect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            min: IVec2::new(left, top),
            max: IVec2::new(right, bottom),
        }
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_size() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(r.x2(), 40.0);
        assert_eq!(r.y2(), 60.0);
        assert_eq!(r.size(), Vec2::new(30.0, 40.0));
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn moved_to_keeps_size() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).moved_to(Vec2::new(100.0, 100.0));
        assert_eq!(r, Rect::new(95.0, 98.0, 105.0, 102.0));
    }

    #[test]
    fn to_pixels_truncates_toward_zero() {
        let r = Rect::new(1.9, -1.9, 10.5, 7.99);
        assert_eq!(r.to_pixels(), IRect::new(1, -1, 10, 7));
    }

    #[test]
    fn degenerate_pixel_rect_is_empty() {
        assert!(IRect::new(5, 5, 5, 10).is_empty());
        assert!(!IRect::new(0, 0, 1, 1).is_empty());
    }
}
