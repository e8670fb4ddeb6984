//! Integer axis-aligned bounding box

use serde::{Deserialize, Serialize};
use tilekit_math::{IVec2, Vec2};

/// Axis-aligned bounding box in world units
///
/// `position` is the lower-left (south-west) corner, `bounds` the size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aabb {
    pub position: IVec2,
    pub bounds: IVec2,
}

impl Aabb {
    #[inline]
    pub const fn new(position: IVec2, bounds: IVec2) -> Self {
        Self { position, bounds }
    }

    /// Convenience constructor from raw coordinates
    #[inline]
    pub const fn from_coords(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(IVec2::new(x, y), IVec2::new(width, height))
    }

    /// Upper-right (north-east) corner
    #[inline]
    pub fn max(&self) -> IVec2 {
        self.position + self.bounds
    }

    /// Whether `other` lies entirely inside this box, edges included
    pub fn contains(&self, other: &Aabb) -> bool {
        let max = self.max();
        let other_max = other.max();
        self.position.x <= other.position.x
            && self.position.y <= other.position.y
            && max.x >= other_max.x
            && max.y >= other_max.y
    }

    /// Whether `point` (truncated to world units) lies inside the box, edges included
    pub fn inner_point(&self, point: Vec2) -> bool {
        let local = point.trunc() - self.position;
        local.x >= 0 && local.y >= 0 && local.x <= self.bounds.x && local.y <= self.bounds.y
    }

    /// Whether the boxes overlap with a non-zero area
    ///
    /// Boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let max = self.max();
        let other_max = other.max();
        !(self.position.x >= other_max.x
            || self.position.y >= other_max.y
            || max.x <= other.position.x
            || max.y <= other.position.y)
    }

    /// Smallest box covering this box and the box moved by `displacement`
    pub fn expand(&self, displacement: IVec2) -> Aabb {
        Aabb::new(
            self.position + displacement.min_components(IVec2::ZERO),
            self.bounds + displacement.abs(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let outer = Aabb::from_coords(0, 0, 10, 10);
        assert!(outer.contains(&Aabb::from_coords(2, 2, 3, 3)));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&Aabb::from_coords(8, 8, 3, 3)));
        assert!(!Aabb::from_coords(2, 2, 3, 3).contains(&outer));
    }

    #[test]
    fn test_inner_point() {
        let b = Aabb::from_coords(10, 10, 5, 5);
        assert!(b.inner_point(Vec2::new(10.0, 10.0)));
        assert!(b.inner_point(Vec2::new(15.0, 15.0)));
        assert!(b.inner_point(Vec2::new(15.9, 12.0)));
        assert!(!b.inner_point(Vec2::new(9.0, 12.0)));
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = Aabb::from_coords(0, 0, 4, 4);
        assert!(!a.intersects(&Aabb::from_coords(4, 0, 4, 4)));
        assert!(!a.intersects(&Aabb::from_coords(0, 4, 4, 4)));
        assert!(a.intersects(&Aabb::from_coords(3, 3, 4, 4)));
        assert!(a.intersects(&Aabb::from_coords(1, 1, 1, 1)));
    }

    #[test]
    fn test_expand() {
        let a = Aabb::from_coords(10, 10, 4, 4);
        assert_eq!(a.expand(IVec2::new(3, -2)), Aabb::from_coords(10, 8, 7, 6));
        assert_eq!(a.expand(IVec2::ZERO), a);
    }
}
