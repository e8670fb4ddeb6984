//! Float axis-aligned rectangle, used by the GUI and the renderer

use serde::{Deserialize, Serialize};

use crate::Vec2;

/// Rectangle given by its lower-left corner and its size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub position: Vec2,
    pub bounds: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(position: Vec2, bounds: Vec2) -> Self {
        Self { position, bounds }
    }

    /// Upper-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.position + self.bounds
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + self.bounds / 2.0
    }

    /// Whether `point` lies inside the rectangle, edges included
    pub fn inner_point(&self, point: Vec2) -> bool {
        let local = point - self.position;
        local.x >= 0.0 && local.y >= 0.0 && local.x <= self.bounds.x && local.y <= self.bounds.y
    }

    /// Whether the two rectangles overlap with a non-zero area
    pub fn intersects(&self, other: &Rect) -> bool {
        let a = self.max();
        let b = other.max();
        !(self.position.x >= b.x
            || a.x <= other.position.x
            || self.position.y >= b.y
            || a.y <= other.position.y)
    }

    /// Same rectangle with its size clamped to `max_size`
    pub fn clamped(&self, max_size: Vec2) -> Rect {
        Rect::new(self.position, self.bounds.min_components(max_size))
    }
}
