//! Logic-only game
//!
//! [`LogicGame`] ties a world, the input handler and the event queue
//! together without any rendering. Each tick it advances the world (firing
//! collision events), then fires the input events. Handlers receive the
//! world as their context.

use tilekit_events::EventQueue;
use tilekit_input::{InputEvent, InputHandler, InputKind};
use tilekit_physics::{
    default_entity_collision_handler, default_tile_collision_handler, Aabb, CollisionEvent, CollisionKind,
    EntityCollision, PhysicsConfig, PhysicsError, TileCollision, TileManager, TileMap, World,
};

use crate::config::AppConfig;
use crate::event::{GameEvent, GameEventKind};
use crate::game_loop::{LogicLoop, LoopHandle};
use crate::level::Level;
use crate::GameError;

/// The event queue of a game
pub type GameQueue = EventQueue<GameEvent, World>;

/// A game without rendering
///
/// `R` holds the tile manager: a plain [`TileManager`] for logic-only
/// games, a `ResourceManager` when the game also renders.
pub struct LogicGame<R = TileManager> {
    resources: R,
    world: World,
    input: InputHandler,
    events: GameQueue,
    physics: PhysicsConfig,
    game_loop: LogicLoop,
}

impl LogicGame<TileManager> {
    /// Logic game with the default configuration
    pub fn new(tile_size: i32) -> Self {
        let mut config = AppConfig::default();
        config.game.tile_size = tile_size;
        Self::from_config(&config)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_resources(TileManager::new(config.game.tile_size), config)
    }
}

impl<R: AsRef<TileManager> + AsMut<TileManager>> LogicGame<R> {
    /// Logic game using `resources` for its tiles
    pub fn with_resources(resources: R, config: &AppConfig) -> Self {
        let mut game = Self {
            resources,
            world: World::new(TileMap::default(), config.physics.clone()),
            input: InputHandler::new(config.input.clone()),
            events: EventQueue::with_history_length(config.events.history_length),
            physics: config.physics.clone(),
            game_loop: LogicLoop::new(config.game.tick_per_second),
        };

        if config.game.default_tile_collision_handler {
            game.register_tile_collision_handler(|world, event| {
                default_tile_collision_handler(world.objects_mut(), event);
            });
        }
        if config.game.default_entity_collision_handler {
            game.register_entity_collision_handler(|world, event| {
                default_entity_collision_handler(world.objects_mut(), event);
            });
        }
        game
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut R {
        &mut self.resources
    }

    pub fn tile_manager(&self) -> &TileManager {
        self.resources.as_ref()
    }

    pub fn tile_manager_mut(&mut self) -> &mut TileManager {
        self.resources.as_mut()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn events(&self) -> &GameQueue {
        &self.events
    }

    /// Next tick the loop will run
    pub fn tick(&self) -> u64 {
        self.game_loop.tick()
    }

    /// Handle to stop the loop from a handler or another thread
    pub fn handle(&self) -> LoopHandle {
        self.game_loop.handle()
    }

    /// Resources and world borrowed together
    pub(crate) fn split_mut(&mut self) -> (&R, &mut World) {
        (&self.resources, &mut self.world)
    }

    /// Replace the world with a new one built from `tiles`
    pub fn change_world(&mut self, tiles: TileMap, background: Option<String>, logic_area: Option<Aabb>) {
        let physics = self.physics.clone();
        self.change_world_with(tiles, background, logic_area, physics);
    }

    /// Replace the world, overriding the solver settings for it
    pub fn change_world_with(
        &mut self,
        tiles: TileMap,
        background: Option<String>,
        logic_area: Option<Aabb>,
        physics: PhysicsConfig,
    ) {
        log::info!(
            "Changing world: {}x{} tiles, background {:?}",
            tiles.width(),
            tiles.height(),
            background
        );
        let mut world = World::new(tiles, physics);
        world.set_background(background);
        world.set_logic_area(logic_area);
        self.world = world;
    }

    /// Register the tiles of `level` and play it
    pub fn load_level(&mut self, level: &Level) -> Result<(), GameError> {
        let tiles = level.install(self.resources.as_mut())?;
        self.change_world(tiles, level.background.clone(), level.logic_area);
        level.spawn_entities(&mut self.world);
        log::info!("Loaded level '{}' with {} entities", level.name, level.entities.len());
        Ok(())
    }

    /// Advance the world and fire the input events
    pub fn update(&mut self, tick: u64) -> Result<(), GameError> {
        self.update_world(tick)?;
        self.fire_input_events(tick);
        Ok(())
    }

    pub(crate) fn update_world(&mut self, tick: u64) -> Result<(), PhysicsError> {
        let events = &mut self.events;
        self.world.update(tick, self.resources.as_ref(), |world, event| {
            events.fire_event(world, GameEvent::Collision(event));
        })
    }

    /// Fire the input events of `tick`, returning them as left by the handlers
    pub(crate) fn fire_input_events(&mut self, tick: u64) -> Vec<InputEvent> {
        let mut raised = Vec::new();
        self.input.fire_events(tick, |event| raised.push(event));

        let mut fired = Vec::with_capacity(raised.len());
        for event in raised {
            if let GameEvent::Input(event) = self.events.fire_event(&mut self.world, GameEvent::Input(event)) {
                fired.push(event);
            }
        }
        fired
    }

    /// Fire an event through the queue with the world as context
    pub fn fire_event(&mut self, event: GameEvent) -> GameEvent {
        self.events.fire_event(&mut self.world, event)
    }

    /// Run the logic loop
    ///
    /// Runs `ticks` ticks, or until [`stop`](Self::stop) when `None`.
    pub fn run(&mut self, ticks: Option<u64>, max_speed: bool) -> Result<(), GameError> {
        let mut game_loop = self.game_loop.clone();
        let result = game_loop.run(ticks, max_speed, |tick| self.update(tick));
        self.game_loop = game_loop;
        result
    }

    pub fn stop(&self) {
        self.game_loop.stop();
    }

    /// Register a handler for `kind` and its sub-kinds
    pub fn register_event_handler<F>(&mut self, kind: GameEventKind, handler: F)
    where
        F: FnMut(&mut World, &mut GameEvent) + 'static,
    {
        self.events.register_event_handler(kind, handler);
    }

    pub fn register_collision_handler<F>(&mut self, mut handler: F)
    where
        F: FnMut(&mut World, &CollisionEvent) + 'static,
    {
        self.register_event_handler(CollisionKind::Collision.into(), move |world, event| {
            if let GameEvent::Collision(collision) = event {
                handler(world, collision);
            }
        });
    }

    pub fn register_tile_collision_handler<F>(&mut self, mut handler: F)
    where
        F: FnMut(&mut World, &TileCollision) + 'static,
    {
        self.register_event_handler(CollisionKind::WithTile.into(), move |world, event| {
            if let GameEvent::Collision(CollisionEvent::WithTile(collision)) = event {
                handler(world, collision);
            }
        });
    }

    pub fn register_entity_collision_handler<F>(&mut self, mut handler: F)
    where
        F: FnMut(&mut World, &EntityCollision) + 'static,
    {
        self.register_event_handler(CollisionKind::WithEntity.into(), move |world, event| {
            if let GameEvent::Collision(CollisionEvent::WithEntity(collision)) = event {
                handler(world, collision);
            }
        });
    }

    /// Register a handler for input events of `kind` and its sub-kinds
    ///
    /// Any kind is accepted: every input kind descends from
    /// [`InputKind::Input`].
    pub fn register_input_kind_handler<F>(&mut self, kind: InputKind, mut handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_event_handler(kind.into(), move |world, event| {
            if let GameEvent::Input(input) = event {
                handler(world, input);
            }
        });
    }

    pub fn register_input_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::Input, handler);
    }

    pub fn register_key_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::Key, handler);
    }

    pub fn register_key_pressed_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::KeyPressed, handler);
    }

    pub fn register_key_released_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::KeyReleased, handler);
    }

    pub fn register_key_typed_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::KeyTyped, handler);
    }

    pub fn register_key_held_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::KeyHeld, handler);
    }

    pub fn register_mouse_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::Mouse, handler);
    }

    pub fn register_mouse_moved_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::MouseMoved, handler);
    }

    pub fn register_mouse_button_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::MouseButton, handler);
    }

    pub fn register_mouse_button_pressed_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::MouseButtonPressed, handler);
    }

    pub fn register_mouse_button_released_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::MouseButtonReleased, handler);
    }

    pub fn register_mouse_button_clicked_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::MouseButtonClicked, handler);
    }

    pub fn register_mouse_dragged_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &mut InputEvent) + 'static,
    {
        self.register_input_kind_handler(InputKind::MouseDragged, handler);
    }
}

impl<R> std::fmt::Debug for LogicGame<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicGame")
            .field("objects", &self.world.objects().len())
            .field("events", &self.events)
            .field("tick", &self.game_loop.tick())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tilekit_events::Event;
    use tilekit_input::Key;
    use tilekit_math::IVec2;
    use tilekit_physics::{Body, CollisionMap, WorldObject};

    /// One solid tile at (2, 0) in a 4×1 level, 16 units per tile
    fn game_with_wall() -> LogicGame {
        let mut game = LogicGame::new(16);
        let solid = game.tile_manager_mut().register_collision_map(CollisionMap::SOLID);
        let wall = game.tile_manager_mut().register_tile(solid, 0).unwrap();
        game.change_world(TileMap::from_rows(&[vec![0, 0, wall, 0]]), None, None);
        game
    }

    #[test]
    fn test_default_tile_handler_stops_entity() {
        let mut game = game_with_wall();
        let key = game
            .world_mut()
            .spawn(WorldObject::entity(Aabb::from_coords(0, 0, 16, 16), Body::new(IVec2::new(10, 0))));

        for tick in 0..4 {
            game.update(tick).unwrap();
        }
        let entity = game.world().get(key).unwrap();
        assert_eq!(entity.position(), IVec2::new(16, 0));
        assert_eq!(entity.speed(), IVec2::ZERO);
        assert_eq!(game.events().len(), 1);
    }

    #[test]
    fn test_without_default_handlers_safe_mode_fails() {
        let mut config = AppConfig::default();
        config.game.default_tile_collision_handler = false;
        let mut game = LogicGame::from_config(&config);
        let solid = game.tile_manager_mut().register_collision_map(CollisionMap::SOLID);
        let wall = game.tile_manager_mut().register_tile(solid, 0).unwrap();
        game.change_world(TileMap::from_rows(&[vec![0, 0, wall, 0]]), None, None);
        game.world_mut()
            .spawn(WorldObject::entity(Aabb::from_coords(0, 0, 16, 16), Body::new(IVec2::new(10, 0))));

        let result = (0..4).try_for_each(|tick| game.update(tick));
        assert!(matches!(result, Err(GameError::Physics(PhysicsError::UnsolvedCollision { .. }))));
    }

    #[test]
    fn test_handlers_see_world() {
        let mut game = game_with_wall();
        let key = game
            .world_mut()
            .spawn(WorldObject::entity(Aabb::from_coords(0, 0, 16, 16), Body::new(IVec2::new(20, 0))));
        let hits = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&hits);
        game.register_tile_collision_handler(move |world, event| {
            seen.borrow_mut().push((event.tile_position, world.get(event.entity).map(|e| e.position())));
        });

        game.update(0).unwrap();
        assert_eq!(*hits.borrow(), vec![(IVec2::new(2, 0), Some(IVec2::new(16, 0)))]);
        assert!(game.world().get(key).is_some());
    }

    #[test]
    fn test_input_events_go_through_queue() {
        let mut game = LogicGame::new(16);
        let typed = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&typed);
        game.register_key_typed_handler(move |_, event| {
            seen.borrow_mut().push(event.key());
        });
        // canceled presses never reach later handlers
        game.register_key_pressed_handler(|_, event| event.cancel());
        game.register_key_handler(|_, event| assert!(!event.is_kind(InputKind::KeyPressed)));

        game.input_mut().key_press(Key::Q);
        game.update(0).unwrap();
        game.input_mut().key_release(Key::Q);
        game.update(1).unwrap();

        assert_eq!(*typed.borrow(), vec![Some(Key::Q)]);
        assert!(game.events().history().all(|e| e.as_input().is_some()));
    }

    #[test]
    fn test_run_and_stop() {
        let mut game = LogicGame::new(16);
        let handle = game.handle();
        game.register_input_handler(|_, _| {});
        game.run(Some(3), true).unwrap();
        assert_eq!(game.tick(), 3);

        game.register_event_handler(GameEventKind::Any, move |_, event| {
            if event.tick() >= 5 {
                handle.stop();
            }
        });
        game.input_mut().key_press(Key::A);
        game.run(None, true).unwrap();
        assert_eq!(game.tick(), 6);
    }

    #[test]
    fn test_change_world_keeps_physics_config() {
        let mut config = AppConfig::default();
        config.physics.multi_threading = false;
        let mut game = LogicGame::from_config(&config);
        game.change_world(TileMap::new(2, 2), Some("sky".to_string()), None);
        assert!(!game.world().config().multi_threading);
        assert_eq!(game.world().background(), Some("sky"));
    }
}
