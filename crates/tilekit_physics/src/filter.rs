//! Collision layers for entity-versus-entity filtering

use bitflags::bitflags;

bitflags! {
    /// Collision layers for filtering which entities can collide
    ///
    /// Each layer is a bit in a 32-bit mask. Entities can belong to multiple
    /// layers and define which layers they collide with via a mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CollisionLayer: u32 {
        /// Default layer for most entities
        const DEFAULT = 1 << 0;
        /// All layers
        const ALL = 0xFFFFFFFF;
    }
}

/// Layer/mask pair attached to an entity body
///
/// Two entities A and B collide if:
/// - (A.layer & B.mask) != 0, AND
/// - (B.layer & A.mask) != 0
///
/// Tiles are not filtered here; see `Body::collides_with_tiles`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionFilter {
    /// Which layer(s) this entity belongs to
    pub layer: CollisionLayer,
    /// Which layer(s) this entity can collide with
    pub mask: CollisionLayer,
}

impl Default for CollisionFilter {
    /// Entities on the default layer ignore every other entity until given a mask
    fn default() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::empty(),
        }
    }
}

impl CollisionFilter {
    pub fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Default layer, collides with every layer
    pub fn solid() -> Self {
        Self {
            layer: CollisionLayer::DEFAULT,
            mask: CollisionLayer::ALL,
        }
    }

    /// Check if this filter allows collision with another filter
    ///
    /// Returns true if both entities' layers match each other's masks.
    pub fn collides_with(&self, other: &Self) -> bool {
        self.layer.intersects(other.mask) && other.layer.intersects(self.mask)
    }
}
