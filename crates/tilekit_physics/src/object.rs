//! World objects: static props, entities and particles

use slotmap::{new_key_type, SlotMap};
use tilekit_math::IVec2;

use crate::{Aabb, CollisionFilter};

new_key_type! {
    /// Key to an object in a world
    ///
    /// Generational: once an object is removed its key never resolves again,
    /// even if the slot is reused.
    pub struct ObjectKey;
}

/// Moving, colliding part of an entity
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Displacement per tick in world units
    pub speed: IVec2,
    /// Whether solid tile faces stop this body
    pub collides_with_tiles: bool,
    /// Which other entities this body collides with
    pub filter: CollisionFilter,
}

impl Body {
    /// Body colliding with tiles only
    pub fn new(speed: IVec2) -> Self {
        Self {
            speed,
            collides_with_tiles: true,
            filter: CollisionFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_tile_collisions(mut self, collides_with_tiles: bool) -> Self {
        self.collides_with_tiles = collides_with_tiles;
        self
    }
}

/// Drawable part of an object
///
/// The animation pointer counts frames within the current animation. A
/// transition animation plays once on top of the base animation and ends
/// the next time the pointer wraps to 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Where the texture is drawn, relative to the object position
    pub texture_bounds: Aabb,
    /// Name of the sprite set holding the textures
    pub sprite_set: String,
    /// Base animation index in the sprite set
    pub animation: usize,
    /// Rotation in radians
    pub angle: f32,
    pub visible: bool,
    pub flip_horizontally: bool,
    pub flip_vertically: bool,
    transition: Option<usize>,
    animation_pointer: u32,
    one_shot: bool,
    expired: bool,
}

impl Sprite {
    pub fn new(texture_bounds: Aabb, sprite_set: impl Into<String>, animation: usize) -> Self {
        Self {
            texture_bounds,
            sprite_set: sprite_set.into(),
            animation,
            angle: 0.0,
            visible: true,
            flip_horizontally: false,
            flip_vertically: false,
            transition: None,
            animation_pointer: 0,
            one_shot: false,
            expired: false,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_flip(mut self, horizontally: bool, vertically: bool) -> Self {
        self.flip_horizontally = horizontally;
        self.flip_vertically = vertically;
        self
    }

    /// Play the animation once, then hide the sprite and expire its object
    pub fn one_shot(mut self) -> Self {
        self.one_shot = true;
        self
    }

    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    /// Whether a one-shot animation has finished
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    pub fn animation_pointer(&self) -> u32 {
        self.animation_pointer
    }

    /// Move the animation pointer
    ///
    /// Resetting to 0 ends any running transition, and ends a one-shot sprite.
    pub fn set_animation_pointer(&mut self, animation_pointer: u32) {
        if animation_pointer == 0 {
            self.transition = None;
            if self.one_shot {
                self.visible = false;
                self.expired = true;
            }
        }
        self.animation_pointer = animation_pointer;
    }

    /// Play `transition` once, optionally switching the base animation
    pub fn transition(&mut self, transition: usize, animation: Option<usize>) {
        if let Some(animation) = animation {
            self.animation = animation;
        }
        self.set_animation_pointer(0);
        self.transition = Some(transition);
    }

    /// Stop the running transition, optionally switching the base animation
    pub fn cancel_transition(&mut self, animation: Option<usize>) {
        if let Some(animation) = animation {
            self.animation = animation;
        }
        self.transition = None;
        self.set_animation_pointer(0);
    }

    pub fn is_transiting(&self) -> bool {
        self.transition.is_some()
    }

    pub fn transition_animation(&self) -> Option<usize> {
        self.transition
    }

    /// The animation currently played: the transition if any, else the base one
    pub fn current_animation(&self) -> usize {
        self.transition.unwrap_or(self.animation)
    }
}

/// Anything living in a world
#[derive(Clone, Debug, PartialEq)]
pub struct WorldObject {
    pub bounding_box: Aabb,
    /// Present on entities
    pub body: Option<Body>,
    /// Present on drawable objects
    pub sprite: Option<Sprite>,
    destroyed: bool,
}

impl WorldObject {
    /// Static, invisible object
    pub fn new(bounding_box: Aabb) -> Self {
        Self {
            bounding_box,
            body: None,
            sprite: None,
            destroyed: false,
        }
    }

    /// Moving object taking part in collisions
    pub fn entity(bounding_box: Aabb, body: Body) -> Self {
        Self::new(bounding_box).with_body(body)
    }

    /// Drawable object removed once its animation has played
    pub fn particle(bounding_box: Aabb, sprite: Sprite) -> Self {
        Self::new(bounding_box).with_sprite(sprite.one_shot())
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn position(&self) -> IVec2 {
        self.bounding_box.position
    }

    pub fn set_position(&mut self, position: IVec2) {
        self.bounding_box.position = position;
    }

    pub fn bounds(&self) -> IVec2 {
        self.bounding_box.bounds
    }

    /// Speed of the body, zero for objects without one
    pub fn speed(&self) -> IVec2 {
        self.body.as_ref().map(|b| b.speed).unwrap_or(IVec2::ZERO)
    }

    /// Set the body speed; no-op without a body
    pub fn set_speed(&mut self, speed: IVec2) {
        if let Some(body) = self.body.as_mut() {
            body.speed = speed;
        }
    }

    pub fn is_entity(&self) -> bool {
        self.body.is_some()
    }

    /// Flag the object for removal at the start of the next tick
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn should_be_destroyed(&self) -> bool {
        self.destroyed || self.sprite.as_ref().is_some_and(Sprite::is_expired)
    }
}

/// Objects of a world, iterated in spawn order
#[derive(Clone, Debug, Default)]
pub struct Objects {
    map: SlotMap<ObjectKey, WorldObject>,
    order: Vec<ObjectKey>,
}

impl Objects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, object: WorldObject) -> ObjectKey {
        let key = self.map.insert(object);
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, key: ObjectKey) -> Option<WorldObject> {
        let removed = self.map.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(removed)
    }

    pub fn get(&self, key: ObjectKey) -> Option<&WorldObject> {
        self.map.get(key)
    }

    pub fn get_mut(&mut self, key: ObjectKey) -> Option<&mut WorldObject> {
        self.map.get_mut(key)
    }

    /// Two distinct objects at once
    pub fn get_pair_mut(&mut self, a: ObjectKey, b: ObjectKey) -> Option<[&mut WorldObject; 2]> {
        self.map.get_disjoint_mut([a, b])
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys in spawn order
    pub fn keys(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.order.iter().copied()
    }

    /// Objects in spawn order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &WorldObject)> + '_ {
        self.order.iter().filter_map(|key| self.map.get(*key).map(|o| (*key, o)))
    }

    /// Remove every object flagged for destruction, returning how many went
    pub fn remove_destroyed(&mut self) -> usize {
        let before = self.map.len();
        self.map.retain(|_, object| !object.should_be_destroyed());
        let map = &self.map;
        self.order.retain(|key| map.contains_key(*key));
        before - self.map.len()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite() -> Sprite {
        Sprite::new(Aabb::from_coords(0, 0, 8, 8), "hero", 0)
    }

    #[test]
    fn test_entity_builder() {
        let object = WorldObject::entity(Aabb::from_coords(0, 0, 8, 8), Body::new(IVec2::new(1, 0)))
            .with_sprite(sprite());
        assert!(object.is_entity());
        assert_eq!(object.speed(), IVec2::new(1, 0));
        assert!(object.body.as_ref().unwrap().collides_with_tiles);
        assert!(!object.should_be_destroyed());
    }

    #[test]
    fn test_speed_without_body() {
        let mut object = WorldObject::new(Aabb::from_coords(0, 0, 1, 1));
        object.set_speed(IVec2::new(4, 4));
        assert_eq!(object.speed(), IVec2::ZERO);
    }

    #[test]
    fn test_transition_ends_when_pointer_wraps() {
        let mut s = sprite();
        s.transition(3, Some(1));
        assert!(s.is_transiting());
        assert_eq!(s.current_animation(), 3);
        assert_eq!(s.animation, 1);

        s.set_animation_pointer(5);
        assert!(s.is_transiting());
        s.set_animation_pointer(0);
        assert!(!s.is_transiting());
        assert_eq!(s.current_animation(), 1);
    }

    #[test]
    fn test_cancel_transition() {
        let mut s = sprite();
        s.transition(2, None);
        s.set_animation_pointer(4);
        s.cancel_transition(Some(5));
        assert!(!s.is_transiting());
        assert_eq!(s.animation, 5);
        assert_eq!(s.animation_pointer(), 0);
    }

    #[test]
    fn test_particle_expires_when_animation_wraps() {
        let mut particle = WorldObject::particle(Aabb::from_coords(0, 0, 4, 4), sprite());
        let s = particle.sprite.as_mut().unwrap();
        s.set_animation_pointer(1);
        s.set_animation_pointer(2);
        assert!(!particle.should_be_destroyed());

        particle.sprite.as_mut().unwrap().set_animation_pointer(0);
        assert!(particle.should_be_destroyed());
        assert!(!particle.sprite.as_ref().unwrap().visible);
    }

    #[test]
    fn test_objects_keep_spawn_order() {
        let mut objects = Objects::new();
        let a = objects.spawn(WorldObject::new(Aabb::from_coords(0, 0, 1, 1)));
        let b = objects.spawn(WorldObject::new(Aabb::from_coords(1, 0, 1, 1)));
        let c = objects.spawn(WorldObject::new(Aabb::from_coords(2, 0, 1, 1)));
        objects.remove(b);
        let d = objects.spawn(WorldObject::new(Aabb::from_coords(3, 0, 1, 1)));

        let keys: Vec<ObjectKey> = objects.keys().collect();
        assert_eq!(keys, vec![a, c, d]);
        assert!(objects.get(b).is_none());
    }

    #[test]
    fn test_remove_destroyed() {
        let mut objects = Objects::new();
        let a = objects.spawn(WorldObject::new(Aabb::from_coords(0, 0, 1, 1)));
        let b = objects.spawn(WorldObject::new(Aabb::from_coords(1, 0, 1, 1)));
        objects.get_mut(a).unwrap().destroy();

        assert_eq!(objects.remove_destroyed(), 1);
        assert_eq!(objects.keys().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_get_pair_mut() {
        let mut objects = Objects::new();
        let a = objects.spawn(WorldObject::entity(Aabb::from_coords(0, 0, 1, 1), Body::new(IVec2::new(1, 0))));
        let b = objects.spawn(WorldObject::entity(Aabb::from_coords(5, 0, 1, 1), Body::new(IVec2::new(-1, 0))));
        let [first, second] = objects.get_pair_mut(a, b).unwrap();
        first.set_speed(IVec2::ZERO);
        second.set_speed(IVec2::ZERO);
        assert_eq!(objects.get(a).unwrap().speed(), IVec2::ZERO);
        assert!(objects.get_pair_mut(a, a).is_none());
    }
}
