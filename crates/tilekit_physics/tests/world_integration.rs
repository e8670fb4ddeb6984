//! Integration tests for the collision loop
//!
//! These tests drive `World::update` tick by tick:
//! 1. Entities stop against solid tile faces and pass non-solid ones
//! 2. Entities stop in contact with each other, subject to their filters
//! 3. The parallel and sequential solvers agree
//! 4. Unsolved collisions and destroyed objects are handled

use tilekit_math::IVec2;
use tilekit_physics::{
    default_entity_collision_handler, default_tile_collision_handler, Aabb, Body, CollisionEvent,
    CollisionFilter, CollisionMap, Direction, ObjectKey, PhysicsConfig, PhysicsError, Sprite, TileManager,
    TileMap, World, WorldObject,
};

const TILE_SIZE: i32 = 16;
const SOLID: u32 = 1;
const DECORATION: u32 = 2;

fn tile_manager() -> TileManager {
    let mut manager = TileManager::new(TILE_SIZE);
    let solid = manager.register_collision_map(CollisionMap::SOLID);
    let passable = manager.register_collision_map(CollisionMap::PASSABLE);
    manager.register_tile(solid, 0).unwrap();
    manager.register_tile(passable, 1).unwrap();
    manager
}

fn entity(x: i32, y: i32, speed: IVec2) -> WorldObject {
    WorldObject::entity(
        Aabb::from_coords(x, y, TILE_SIZE, TILE_SIZE),
        Body::new(speed).with_filter(CollisionFilter::solid()),
    )
}

/// Default responses, recording every event
fn update(world: &mut World, tick: u64, manager: &TileManager, events: &mut Vec<CollisionEvent>) -> Result<(), PhysicsError> {
    world.update(tick, manager, |world, event| {
        match &event {
            CollisionEvent::WithTile(e) => default_tile_collision_handler(world.objects_mut(), e),
            CollisionEvent::WithEntity(e) => default_entity_collision_handler(world.objects_mut(), e),
        }
        events.push(event);
    })
}

fn position(world: &World, key: ObjectKey) -> IVec2 {
    world.get(key).expect("object should exist").position()
}

// ==================== Tile Collision Tests ====================

/// An entity running into a wall stops flush against it with one event
#[test]
fn test_entity_stops_flush_against_wall() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::from_rows(&[vec![0, 0, 0, SOLID, 0, 0]]), PhysicsConfig::default());
    let key = world.spawn(entity(0, 0, IVec2::new(64, 0)));

    let mut events = Vec::new();
    update(&mut world, 0, &manager, &mut events).unwrap();

    assert_eq!(position(&world, key), IVec2::new(32, 0));
    assert_eq!(world.get(key).unwrap().speed(), IVec2::ZERO);
    assert_eq!(events.len(), 1, "exactly one collision expected");
    match &events[0] {
        CollisionEvent::WithTile(e) => {
            assert_eq!(e.entity, key);
            assert_eq!(e.tile, SOLID);
            assert_eq!(e.tile_position, IVec2::new(3, 0));
            assert_eq!(e.direction, Direction::East);
        }
        other => panic!("Expected a tile collision, got {:?}", other),
    }

    // Resting against the wall raises nothing
    update(&mut world, 1, &manager, &mut events).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(position(&world, key), IVec2::new(32, 0));
}

/// Non-solid tiles do not stop entities
#[test]
fn test_entity_passes_through_decoration() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::from_rows(&[vec![0, 0, 0, DECORATION, 0, 0]]), PhysicsConfig::default());
    let key = world.spawn(entity(0, 0, IVec2::new(64, 0)));

    let mut events = Vec::new();
    update(&mut world, 0, &manager, &mut events).unwrap();

    assert!(events.is_empty());
    assert_eq!(position(&world, key), IVec2::new(64, 0));
}

/// Without tile collisions enabled the wall is ignored
#[test]
fn test_tile_logic_disabled() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::from_rows(&[vec![0, 0, 0, SOLID, 0, 0]]), PhysicsConfig::default());
    world.set_logic_tile(false);
    let key = world.spawn(entity(0, 0, IVec2::new(64, 0)));

    let mut events = Vec::new();
    update(&mut world, 0, &manager, &mut events).unwrap();

    assert!(events.is_empty());
    assert_eq!(position(&world, key), IVec2::new(64, 0));
}

/// A diagonal move into a tile corner stops on the x axis and slides on y
#[test]
fn test_diagonal_move_slides_along_wall() {
    let manager = tile_manager();
    let mut tiles = TileMap::new(4, 4);
    tiles.set(2, 2, SOLID);
    let mut world = World::new(tiles, PhysicsConfig::default());
    let key = world.spawn(entity(0, 0, IVec2::new(32, 32)));

    let mut events = Vec::new();
    update(&mut world, 0, &manager, &mut events).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].direction(), Direction::East);
    assert_eq!(world.get(key).unwrap().speed(), IVec2::new(0, 32));
    assert_eq!(position(&world, key), IVec2::new(16, 32));
}

// ==================== Entity Collision Tests ====================

/// Two entities moving toward each other stop in contact
#[test]
fn test_entities_meet_and_stop() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::new(20, 1), PhysicsConfig::default());
    let a = world.spawn(entity(0, 0, IVec2::new(16, 0)));
    let b = world.spawn(entity(64, 0, IVec2::new(-16, 0)));

    let mut events = Vec::new();
    update(&mut world, 0, &manager, &mut events).unwrap();
    assert!(events.is_empty(), "too far apart to meet on the first tick");
    assert_eq!(position(&world, a), IVec2::new(16, 0));
    assert_eq!(position(&world, b), IVec2::new(48, 0));

    update(&mut world, 1, &manager, &mut events).unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        CollisionEvent::WithEntity(e) => {
            assert_eq!(e.entity, a);
            assert_eq!(e.other, b);
            assert_eq!(e.direction, Direction::East);
        }
        other => panic!("Expected an entity collision, got {:?}", other),
    }
    assert_eq!(position(&world, a), IVec2::new(24, 0));
    assert_eq!(position(&world, b), IVec2::new(40, 0));
    assert_eq!(world.get(a).unwrap().speed(), IVec2::ZERO);
    assert_eq!(world.get(b).unwrap().speed(), IVec2::ZERO);
}

/// Entities whose filters do not match go through each other
#[test]
fn test_filters_prevent_collisions() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::new(20, 1), PhysicsConfig::default());
    let a = world.spawn(WorldObject::entity(
        Aabb::from_coords(0, 0, 16, 16),
        Body::new(IVec2::new(16, 0)),
    ));
    let b = world.spawn(entity(64, 0, IVec2::new(-16, 0)));

    let mut events = Vec::new();
    for tick in 0..3 {
        update(&mut world, tick, &manager, &mut events).unwrap();
    }

    assert!(events.is_empty());
    assert_eq!(position(&world, a), IVec2::new(48, 0));
    assert_eq!(position(&world, b), IVec2::new(16, 0));
}

/// Entity logic can be switched off as a whole
#[test]
fn test_entity_logic_disabled() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::new(20, 1), PhysicsConfig::default());
    world.set_logic_entity(false);
    world.spawn(entity(16, 0, IVec2::new(16, 0)));
    world.spawn(entity(48, 0, IVec2::new(-16, 0)));

    let mut events = Vec::new();
    update(&mut world, 0, &manager, &mut events).unwrap();
    assert!(events.is_empty());
}

// ==================== Solver Tests ====================

fn crowded_world(config: PhysicsConfig) -> (World, Vec<ObjectKey>) {
    let width = 40;
    let rows = 12;
    let height = rows * 2;
    let mut tiles = TileMap::new(width, height);
    for y in 0..height {
        tiles.set(0, y, SOLID);
        tiles.set(width - 1, y, SOLID);
    }
    let mut world = World::new(tiles, config);

    let mut keys = Vec::new();
    for row in 0..rows as i32 {
        for column in 0..5 {
            let x = 32 + column * 112 + row * 3;
            let speed = ((row * 7 + column * 13) % 31 - 15) * if column % 2 == 0 { 1 } else { -1 };
            keys.push(world.spawn(entity(x, row * 2 * TILE_SIZE, IVec2::new(speed, 0))));
        }
    }
    (world, keys)
}

fn run_crowded(config: PhysicsConfig) -> (Vec<Result<(), PhysicsError>>, Vec<CollisionEvent>, Vec<IVec2>) {
    let manager = tile_manager();
    let (mut world, keys) = crowded_world(config);
    let mut events = Vec::new();
    let results = (0..30).map(|tick| update(&mut world, tick, &manager, &mut events)).collect();
    let positions = keys.iter().map(|key| position(&world, *key)).collect();
    (results, events, positions)
}

/// Splitting the narrow phase across threads does not change the outcome
#[test]
fn test_parallel_and_sequential_agree() {
    let sequential = run_crowded(PhysicsConfig {
        multi_threading: false,
        ..PhysicsConfig::default()
    });
    let parallel = run_crowded(PhysicsConfig {
        multi_threading: true,
        entity_per_thread: 4,
        ..PhysicsConfig::default()
    });

    assert!(!sequential.1.is_empty(), "the scenario should produce collisions");
    assert_eq!(sequential.0, parallel.0);
    assert_eq!(sequential.1, parallel.1);
    assert_eq!(sequential.2, parallel.2);
}

/// A handler that leaves the collision in place is reported in safe mode
#[test]
fn test_safe_mode_reports_unsolved_collision() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::from_rows(&[vec![0, 0, 0, SOLID, 0, 0]]), PhysicsConfig::default());
    world.spawn(entity(0, 0, IVec2::new(64, 0)));

    let mut fired = 0;
    let result = world.update(7, &manager, |_, _| fired += 1);

    assert_eq!(result, Err(PhysicsError::UnsolvedCollision { tick: 7, time_of_impact: 0.5 }));
    assert_eq!(fired, 1);
}

/// Objects spawned by a handler only start moving on the next tick
#[test]
fn test_spawn_during_tick() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::from_rows(&[vec![0, 0, 0, SOLID, 0, 0]]), PhysicsConfig::default());
    world.spawn(entity(0, 0, IVec2::new(64, 0)));

    let mut spawned = None;
    world
        .update(0, &manager, |world, event| {
            if let CollisionEvent::WithTile(e) = &event {
                default_tile_collision_handler(world.objects_mut(), e);
                spawned = Some(world.spawn(entity(0, 0, IVec2::new(8, 0))));
            }
        })
        .unwrap();

    let spawned = spawned.expect("handler should have spawned an entity");
    assert_eq!(position(&world, spawned), IVec2::ZERO);
}

// ==================== Lifecycle Tests ====================

/// Particles are removed once their animation has played
#[test]
fn test_particles_destroyed_after_animation() {
    let manager = tile_manager();
    let mut world = World::new(TileMap::new(4, 4), PhysicsConfig::default());
    let particle = world.spawn(WorldObject::particle(
        Aabb::from_coords(0, 0, 8, 8),
        Sprite::new(Aabb::from_coords(0, 0, 8, 8), "smoke", 0),
    ));

    world.update(0, &manager, |_, _| {}).unwrap();
    assert!(world.get(particle).is_some());

    let sprite = world.get_mut(particle).unwrap().sprite.as_mut().unwrap();
    sprite.set_animation_pointer(1);
    sprite.set_animation_pointer(0);

    world.update(1, &manager, |_, _| {}).unwrap();
    assert!(world.get(particle).is_none());
}
