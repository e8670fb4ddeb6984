//! Collision events and the default collision responses

use tilekit_events::{Event, EventKind};
use tilekit_math::IVec2;

use crate::{Direction, ObjectKey, Objects, TileId};

/// Kinds of collision events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    /// Any collision
    Collision,
    WithTile,
    WithEntity,
}

impl EventKind for CollisionKind {
    fn parent(self) -> Option<Self> {
        match self {
            CollisionKind::Collision => None,
            CollisionKind::WithTile | CollisionKind::WithEntity => Some(CollisionKind::Collision),
        }
    }
}

/// An entity ran into a solid tile face
#[derive(Clone, Debug, PartialEq)]
pub struct TileCollision {
    pub tick: u64,
    pub entity: ObjectKey,
    pub tile: TileId,
    /// Tile coordinates of the tile that was hit
    pub tile_position: IVec2,
    /// Direction the entity was moving in
    pub direction: Direction,
}

/// Two entities ran into each other
#[derive(Clone, Debug, PartialEq)]
pub struct EntityCollision {
    pub tick: u64,
    pub entity: ObjectKey,
    pub other: ObjectKey,
    /// Direction of the collision relative to `entity`
    pub direction: Direction,
}

impl EntityCollision {
    /// Swap the two entities so the event reads from `other`'s side
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.entity, &mut self.other);
        self.direction = self.direction.opposite();
    }
}

/// Collision raised by the world while it moves entities
#[derive(Clone, Debug, PartialEq)]
pub enum CollisionEvent {
    WithTile(TileCollision),
    WithEntity(EntityCollision),
}

impl CollisionEvent {
    /// The entity the collision is reported for
    pub fn entity(&self) -> ObjectKey {
        match self {
            CollisionEvent::WithTile(e) => e.entity,
            CollisionEvent::WithEntity(e) => e.entity,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            CollisionEvent::WithTile(e) => e.direction,
            CollisionEvent::WithEntity(e) => e.direction,
        }
    }
}

impl Event for CollisionEvent {
    type Kind = CollisionKind;

    fn tick(&self) -> u64 {
        match self {
            CollisionEvent::WithTile(e) => e.tick,
            CollisionEvent::WithEntity(e) => e.tick,
        }
    }

    fn kind(&self) -> CollisionKind {
        match self {
            CollisionEvent::WithTile(_) => CollisionKind::WithTile,
            CollisionEvent::WithEntity(_) => CollisionKind::WithEntity,
        }
    }
}

/// Stop the entity along the axis of the face it hit
pub fn default_tile_collision_handler(objects: &mut Objects, event: &TileCollision) {
    if let Some(body) = objects.get_mut(event.entity).and_then(|o| o.body.as_mut()) {
        *body.speed.axis_mut(event.direction.axis()) = 0;
    }
}

/// Stop colliding entities along the collision axis
///
/// Entities moving towards each other (or one of them still) both stop. When
/// they move the same way only the faster one stops, the reported entity
/// winning ties.
pub fn default_entity_collision_handler(objects: &mut Objects, event: &EntityCollision) {
    let axis = event.direction.axis();
    let Some([entity, other]) = objects.get_pair_mut(event.entity, event.other) else {
        return;
    };
    let (Some(entity), Some(other)) = (entity.body.as_mut(), other.body.as_mut()) else {
        return;
    };

    let entity_speed = entity.speed.axis(axis);
    let other_speed = other.speed.axis(axis);
    if (entity_speed as i64) * (other_speed as i64) <= 0 {
        *entity.speed.axis_mut(axis) = 0;
        *other.speed.axis_mut(axis) = 0;
    } else if entity_speed.abs() >= other_speed.abs() {
        *entity.speed.axis_mut(axis) = 0;
    } else {
        *other.speed.axis_mut(axis) = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aabb, Body, WorldObject};

    fn entity(objects: &mut Objects, speed: IVec2) -> ObjectKey {
        objects.spawn(WorldObject::entity(Aabb::from_coords(0, 0, 4, 4), Body::new(speed)))
    }

    #[test]
    fn test_kind_hierarchy() {
        let mut objects = Objects::new();
        let key = entity(&mut objects, IVec2::ZERO);
        let event = CollisionEvent::WithTile(TileCollision {
            tick: 1,
            entity: key,
            tile: 2,
            tile_position: IVec2::new(3, 4),
            direction: Direction::East,
        });
        assert!(event.is_kind(CollisionKind::Collision));
        assert!(event.is_kind(CollisionKind::WithTile));
        assert!(!event.is_kind(CollisionKind::WithEntity));
        assert_eq!(event.tick(), 1);
    }

    #[test]
    fn test_reverse() {
        let mut objects = Objects::new();
        let a = entity(&mut objects, IVec2::ZERO);
        let b = entity(&mut objects, IVec2::ZERO);
        let mut event = EntityCollision { tick: 0, entity: a, other: b, direction: Direction::North };
        event.reverse();
        assert_eq!(event.entity, b);
        assert_eq!(event.other, a);
        assert_eq!(event.direction, Direction::South);
    }

    #[test]
    fn test_tile_handler_zeroes_collision_axis() {
        let mut objects = Objects::new();
        let key = entity(&mut objects, IVec2::new(3, -2));
        let mut event = TileCollision {
            tick: 0,
            entity: key,
            tile: 1,
            tile_position: IVec2::ZERO,
            direction: Direction::West,
        };
        default_tile_collision_handler(&mut objects, &event);
        assert_eq!(objects.get(key).unwrap().speed(), IVec2::new(0, -2));

        event.direction = Direction::South;
        default_tile_collision_handler(&mut objects, &event);
        assert_eq!(objects.get(key).unwrap().speed(), IVec2::ZERO);
    }

    #[test]
    fn test_entity_handler_head_on_stops_both() {
        let mut objects = Objects::new();
        let a = entity(&mut objects, IVec2::new(2, 1));
        let b = entity(&mut objects, IVec2::new(-3, 1));
        let event = EntityCollision { tick: 0, entity: a, other: b, direction: Direction::East };
        default_entity_collision_handler(&mut objects, &event);
        assert_eq!(objects.get(a).unwrap().speed(), IVec2::new(0, 1));
        assert_eq!(objects.get(b).unwrap().speed(), IVec2::new(0, 1));
    }

    #[test]
    fn test_entity_handler_chasing_stops_faster() {
        let mut objects = Objects::new();
        let a = entity(&mut objects, IVec2::new(0, 5));
        let b = entity(&mut objects, IVec2::new(0, 2));
        let event = EntityCollision { tick: 0, entity: a, other: b, direction: Direction::North };
        default_entity_collision_handler(&mut objects, &event);
        assert_eq!(objects.get(a).unwrap().speed(), IVec2::ZERO);
        assert_eq!(objects.get(b).unwrap().speed(), IVec2::new(0, 2));
    }

    #[test]
    fn test_entity_handler_tie_stops_reported_entity() {
        let mut objects = Objects::new();
        let a = entity(&mut objects, IVec2::new(-2, 0));
        let b = entity(&mut objects, IVec2::new(-2, 0));
        let event = EntityCollision { tick: 0, entity: a, other: b, direction: Direction::West };
        default_entity_collision_handler(&mut objects, &event);
        assert_eq!(objects.get(a).unwrap().speed(), IVec2::ZERO);
        assert_eq!(objects.get(b).unwrap().speed(), IVec2::new(-2, 0));
    }
}
