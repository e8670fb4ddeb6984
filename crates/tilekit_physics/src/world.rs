//! The world: tiles, objects and the per-tick collision loop

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tilekit_math::IVec2;

use crate::quadtree::{DEFAULT_MAX_DEPTH, DEFAULT_NODE_CAPACITY};
use crate::sweep::CollisionObject;
use crate::updater::{Colliders, WorldUpdater};
use crate::{
    Aabb, CollisionEvent, EntityCollision, ObjectKey, Objects, PhysicsError, TileCollision, TileManager, TileMap,
    WorldObject,
};

/// Collision solver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Detect collisions between entities and tiles
    pub logic_tile: bool,
    /// Detect collisions between entities
    pub logic_entity: bool,
    /// Fail the tick when a collision is reported twice instead of looping
    pub safe_mode: bool,
    /// Run the narrow phase on the rayon thread pool
    pub multi_threading: bool,
    /// Entities handled by each parallel job
    pub entity_per_thread: usize,
    /// Quadtree node capacity before splitting
    pub node_capacity: usize,
    /// Quadtree depth limit
    pub max_depth: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            logic_tile: true,
            logic_entity: true,
            safe_mode: true,
            multi_threading: true,
            entity_per_thread: 32,
            node_capacity: DEFAULT_NODE_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A level being played
#[derive(Debug, Clone, Default)]
pub struct World {
    objects: Objects,
    tiles: TileMap,
    background: Option<String>,
    logic_area: Option<Aabb>,
    config: PhysicsConfig,
}

impl World {
    pub fn new(tiles: TileMap, config: PhysicsConfig) -> Self {
        Self {
            objects: Objects::new(),
            tiles,
            background: None,
            logic_area: None,
            config,
        }
    }

    /// World without tiles or objects
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
    }

    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut TileMap {
        &mut self.tiles
    }

    pub fn set_tiles(&mut self, tiles: TileMap) {
        self.tiles = tiles;
    }

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut Objects {
        &mut self.objects
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    pub fn set_logic_tile(&mut self, enabled: bool) {
        self.config.logic_tile = enabled;
    }

    pub fn set_logic_entity(&mut self, enabled: bool) {
        self.config.logic_entity = enabled;
    }

    /// Area covered by the broad phase; defaults to the whole tile map
    pub fn logic_area(&self, tile_size: i32) -> Aabb {
        self.logic_area.unwrap_or_else(|| {
            Aabb::from_coords(
                0,
                0,
                self.tiles.width() as i32 * tile_size,
                self.tiles.height() as i32 * tile_size,
            )
        })
    }

    pub fn set_logic_area(&mut self, logic_area: Option<Aabb>) {
        self.logic_area = logic_area;
    }

    pub fn spawn(&mut self, object: WorldObject) -> ObjectKey {
        self.objects.spawn(object)
    }

    pub fn get(&self, key: ObjectKey) -> Option<&WorldObject> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut WorldObject> {
        self.objects.get_mut(key)
    }

    pub fn remove(&mut self, key: ObjectKey) -> Option<WorldObject> {
        self.objects.remove(key)
    }

    /// Advance every entity by one tick
    ///
    /// Collisions are resolved in time order. Each one is handed to
    /// `dispatch` together with the world, so handlers can change speeds
    /// before the solver looks for the next collision. Entities spawned
    /// during the tick start moving on the next one.
    pub fn update<F>(&mut self, tick: u64, tile_manager: &TileManager, mut dispatch: F) -> Result<(), PhysicsError>
    where
        F: FnMut(&mut World, CollisionEvent),
    {
        let removed = self.objects.remove_destroyed();
        if removed > 0 {
            log::debug!("Tick {}: removed {} destroyed objects", tick, removed);
        }

        let entities: Vec<ObjectKey> = self
            .objects
            .iter()
            .filter(|(_, object)| object.is_entity())
            .map(|(key, _)| key)
            .collect();
        if entities.is_empty() {
            return Ok(());
        }

        let logic_area = self.logic_area(tile_manager.tile_size());
        let mut local_times = vec![0.0; entities.len()];
        let mut past_events = HashSet::new();

        loop {
            let snapshots = self.snapshots(&entities, &local_times);
            let events = WorldUpdater::new(&self.tiles, tile_manager, logic_area, &self.config)
                .fetch_next_events(&snapshots)?;
            if events.is_empty() {
                break;
            }
            log::trace!("Tick {}: resolving {} collisions", tick, events.len());

            for event in events {
                if self.config.safe_mode && !past_events.insert(event.key()) {
                    return Err(PhysicsError::UnsolvedCollision {
                        tick,
                        time_of_impact: event.time_of_impact,
                    });
                }

                match event.colliders {
                    Colliders::Entities(a, b) => {
                        for index in [a, b] {
                            self.advance(entities[index], event.time_of_impact - local_times[index], f64::floor);
                            local_times[index] = event.time_of_impact;
                        }
                        let collision = EntityCollision {
                            tick,
                            entity: entities[a],
                            other: entities[b],
                            direction: event.direction,
                        };
                        dispatch(self, CollisionEvent::WithEntity(collision));
                    }
                    Colliders::Tile { entity, tile, position } => {
                        self.advance(entities[entity], event.time_of_impact - local_times[entity], f64::floor);
                        local_times[entity] = event.time_of_impact;
                        let collision = TileCollision {
                            tick,
                            entity: entities[entity],
                            tile,
                            tile_position: position,
                            direction: event.direction,
                        };
                        dispatch(self, CollisionEvent::WithTile(collision));
                    }
                }
            }
        }

        for (key, local_time) in entities.iter().zip(&local_times) {
            self.advance(*key, 1.0 - local_time, f64::trunc);
        }
        Ok(())
    }

    /// Snapshot of the entities still alive, indexed by their place in `entities`
    fn snapshots(&self, entities: &[ObjectKey], local_times: &[f64]) -> Vec<CollisionObject> {
        entities
            .iter()
            .enumerate()
            .filter_map(|(index, key)| {
                let object = self.objects.get(*key)?;
                let body = object.body.as_ref()?;
                Some(CollisionObject::new(index, object, body, local_times[index]))
            })
            .collect()
    }

    /// Move an entity along its speed for `elapsed` ticks
    fn advance(&mut self, key: ObjectKey, elapsed: f64, round: fn(f64) -> f64) {
        let Some(object) = self.objects.get_mut(key) else {
            return;
        };
        let position = object.position().as_f64();
        let speed = object.speed().as_f64();
        object.set_position(IVec2::new(
            round(position[0] + speed[0] * elapsed) as i32,
            round(position[1] + speed[1] * elapsed) as i32,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Body;

    #[test]
    fn test_default_logic_area_covers_map() {
        let world = World::new(TileMap::new(10, 5), PhysicsConfig::default());
        assert_eq!(world.logic_area(16), Aabb::from_coords(0, 0, 160, 80));
    }

    #[test]
    fn test_free_movement() {
        let manager = TileManager::new(16);
        let mut world = World::new(TileMap::new(10, 10), PhysicsConfig::default());
        let key = world.spawn(WorldObject::entity(Aabb::from_coords(8, 8, 4, 4), Body::new(IVec2::new(3, -2))));
        let still = world.spawn(WorldObject::new(Aabb::from_coords(50, 50, 4, 4)));

        world.update(0, &manager, |_, _| panic!("no collision expected")).unwrap();
        assert_eq!(world.get(key).unwrap().position(), IVec2::new(11, 6));
        assert_eq!(world.get(still).unwrap().position(), IVec2::new(50, 50));
    }

    #[test]
    fn test_destroyed_objects_removed_first() {
        let manager = TileManager::new(16);
        let mut world = World::new(TileMap::new(4, 4), PhysicsConfig::default());
        let key = world.spawn(WorldObject::entity(Aabb::from_coords(0, 0, 4, 4), Body::new(IVec2::new(1, 0))));
        world.get_mut(key).unwrap().destroy();
        world.update(0, &manager, |_, _| {}).unwrap();
        assert!(world.get(key).is_none());
        assert!(world.objects().is_empty());
    }
}
