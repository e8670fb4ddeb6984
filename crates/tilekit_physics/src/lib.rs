//! Tile world physics for tilekit
//!
//! This crate provides:
//! - Integer AABBs, tiles, tile maps and collision maps
//! - World objects (entities, particles, static objects) with sprites
//! - Swept collision detection against tiles and between entities,
//!   parallelized with rayon
//! - Collision events and the default responses to them

pub mod aabb;
pub mod direction;
pub mod error;
pub mod events;
pub mod filter;
pub mod object;
pub mod quadtree;
pub mod sweep;
pub mod tile_sweep;
pub mod tiles;
pub mod updater;
pub mod world;

// Re-export commonly used types
pub use aabb::Aabb;
pub use direction::Direction;
pub use error::PhysicsError;
pub use events::{
    default_entity_collision_handler, default_tile_collision_handler, CollisionEvent, CollisionKind,
    EntityCollision, TileCollision,
};
pub use filter::{CollisionFilter, CollisionLayer};
pub use object::{Body, ObjectKey, Objects, Sprite, WorldObject};
pub use quadtree::QuadTree;
pub use tiles::{CollisionMap, TileId, TileManager, TileMap, EMPTY_TILE};
pub use world::{PhysicsConfig, World};
