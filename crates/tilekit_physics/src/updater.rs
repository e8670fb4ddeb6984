//! Broad and narrow phase of a collision pass
//!
//! Every entity looks for its earliest collision in the remaining part of
//! the tick. The candidates are then reduced to a set of independent events:
//! two events are dependent when they share an entity, and only the
//! earliest of dependent events is kept.

use rayon::prelude::*;
use tilekit_math::IVec2;

use crate::quadtree::QuadTree;
use crate::sweep::{entity_time_of_impact, CollisionObject};
use crate::tile_sweep::TileSweep;
use crate::{Aabb, Direction, PhysicsConfig, PhysicsError, TileId, TileManager, TileMap};

/// What collided, as indices into the tick's entity list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colliders {
    Entities(usize, usize),
    Tile {
        entity: usize,
        tile: TileId,
        position: IVec2,
    },
}

impl Colliders {
    fn involves(&self, entity: usize) -> bool {
        match *self {
            Colliders::Entities(a, b) => a == entity || b == entity,
            Colliders::Tile { entity: e, .. } => e == entity,
        }
    }

    /// Whether both collisions involve a common entity
    pub fn shares_entity(&self, other: &Colliders) -> bool {
        match *self {
            Colliders::Entities(a, b) => other.involves(a) || other.involves(b),
            Colliders::Tile { entity, .. } => other.involves(entity),
        }
    }
}

/// A collision found by the narrow phase, not yet fired
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PseudoEvent {
    pub time_of_impact: f64,
    pub colliders: Colliders,
    /// Relative to the first collider
    pub direction: Direction,
}

impl PseudoEvent {
    /// Happens strictly before `other` and shares an entity with it
    pub fn preempts(&self, other: &PseudoEvent) -> bool {
        self.time_of_impact < other.time_of_impact && self.colliders.shares_entity(&other.colliders)
    }

    /// Happens at the same time as `other` and shares an entity with it
    pub fn same_time(&self, other: &PseudoEvent) -> bool {
        self.time_of_impact == other.time_of_impact && self.colliders.shares_entity(&other.colliders)
    }

    /// Identity of the event within a tick
    pub fn key(&self) -> (Colliders, u64) {
        (self.colliders, self.time_of_impact.to_bits())
    }
}

/// Finds the next collisions to resolve
pub struct WorldUpdater<'a> {
    tiles: TileSweep<'a>,
    logic_area: Aabb,
    config: &'a PhysicsConfig,
}

impl<'a> WorldUpdater<'a> {
    pub fn new(tiles: &'a TileMap, tile_manager: &'a TileManager, logic_area: Aabb, config: &'a PhysicsConfig) -> Self {
        Self {
            tiles: TileSweep::new(tiles, tile_manager),
            logic_area,
            config,
        }
    }

    /// Independent collisions to resolve next, earliest per entity
    pub fn fetch_next_events(&self, objects: &[CollisionObject]) -> Result<Vec<PseudoEvent>, PhysicsError> {
        let mut tree = QuadTree::new(self.logic_area, self.config.node_capacity, self.config.max_depth);
        for position in 0..objects.len() {
            tree.insert(position, objects);
        }

        let events: Vec<PseudoEvent> = if self.config.multi_threading {
            let chunks = objects
                .par_chunks(self.config.entity_per_thread.max(1))
                .map(|chunk| self.process_collision_events(chunk, objects, &tree))
                .collect::<Result<Vec<_>, _>>()?;
            chunks.into_iter().flatten().collect()
        } else {
            self.process_collision_events(objects, objects, &tree)?
        };

        let mut next_events: Vec<PseudoEvent> = Vec::with_capacity(events.len());
        for event in &events {
            if next_events.iter().any(|kept| kept.same_time(event)) {
                continue;
            }
            if events.iter().any(|other| other.preempts(event)) {
                continue;
            }
            next_events.push(*event);
        }
        Ok(next_events)
    }

    /// Earliest collision of each entity of `colliding`
    fn process_collision_events(
        &self,
        colliding: &[CollisionObject],
        objects: &[CollisionObject],
        tree: &QuadTree,
    ) -> Result<Vec<PseudoEvent>, PhysicsError> {
        let mut events = Vec::new();

        for collider in colliding {
            let mut best: Option<PseudoEvent> = None;
            let mut time_of_impact = 1.0;

            if self.config.logic_entity {
                for position in tree.intersect(&collider.swept_box, objects) {
                    let collided = &objects[position];
                    if collider.index >= collided.index || !collider.should_collide_with(collided) {
                        continue;
                    }
                    if let Some((time, direction)) = entity_time_of_impact(collider, collided) {
                        if time < time_of_impact {
                            time_of_impact = time;
                            best = Some(PseudoEvent {
                                time_of_impact: time,
                                colliders: Colliders::Entities(collider.index, collided.index),
                                direction,
                            });
                        }
                    }
                }
            }

            if self.config.logic_tile && collider.collides_with_tiles {
                if let Some(hit) = self.tiles.time_of_impact(collider)? {
                    if hit.time_of_impact < time_of_impact {
                        best = Some(PseudoEvent {
                            time_of_impact: hit.time_of_impact,
                            colliders: Colliders::Tile {
                                entity: collider.index,
                                tile: hit.tile,
                                position: hit.position,
                            },
                            direction: hit.direction,
                        });
                    }
                }
            }

            events.extend(best);
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_event(time_of_impact: f64, a: usize, b: usize) -> PseudoEvent {
        PseudoEvent {
            time_of_impact,
            colliders: Colliders::Entities(a, b),
            direction: Direction::East,
        }
    }

    fn tile_event(time_of_impact: f64, entity: usize) -> PseudoEvent {
        PseudoEvent {
            time_of_impact,
            colliders: Colliders::Tile {
                entity,
                tile: 1,
                position: IVec2::ZERO,
            },
            direction: Direction::South,
        }
    }

    #[test]
    fn test_dependency() {
        assert!(entity_event(0.2, 0, 1).preempts(&tile_event(0.5, 1)));
        assert!(tile_event(0.2, 1).preempts(&entity_event(0.5, 0, 1)));
        assert!(!tile_event(0.2, 2).preempts(&entity_event(0.5, 0, 1)));
        assert!(!entity_event(0.5, 0, 1).preempts(&tile_event(0.5, 1)));
        assert!(entity_event(0.5, 0, 1).same_time(&entity_event(0.5, 1, 2)));
        assert!(!tile_event(0.5, 3).same_time(&tile_event(0.5, 4)));
    }

    #[test]
    fn test_event_key_includes_time() {
        assert_eq!(tile_event(0.5, 1).key(), tile_event(0.5, 1).key());
        assert_ne!(tile_event(0.5, 1).key(), tile_event(0.25, 1).key());
    }
}
