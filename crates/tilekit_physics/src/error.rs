//! Physics error types

use std::fmt;

use crate::tiles::TileId;

/// Error raised by tile lookups and the collision solver
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A tile id with no registration in the tile manager
    UnknownTile(TileId),
    /// A collision map id with no registration in the tile manager
    UnknownCollisionMap(usize),
    /// The same collision was produced twice in one tick
    UnsolvedCollision {
        tick: u64,
        time_of_impact: f64,
    },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::UnknownTile(id) => write!(f, "Unknown tile id: {}", id),
            PhysicsError::UnknownCollisionMap(id) => write!(f, "Unknown collision map id: {}", id),
            PhysicsError::UnsolvedCollision { tick, time_of_impact } => write!(
                f,
                "Unsolved collision at tick {} (time of impact {:.4}): a handler did not resolve it",
                tick, time_of_impact
            ),
        }
    }
}

impl std::error::Error for PhysicsError {}
