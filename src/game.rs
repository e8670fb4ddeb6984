//! Rendered game
//!
//! A [`Game`] is a [`LogicGame`] over a `ResourceManager`, plus a camera, a
//! GUI and a render backend. Ticks run the logic then route clicks and typed
//! keys to the GUI; frames draw the world then the GUI on top.

use tilekit_events::Event;
use tilekit_input::{InputAction, InputHandler};
use tilekit_math::Vec2;
use tilekit_physics::{Aabb, TileMap, World};
use tilekit_render::gui::{GuiEvent, GuiKind};
use tilekit_render::{Camera, Frame, GuiManager, HeadlessBackend, RenderBackend, ResourceManager, WorldRenderer};

use crate::config::AppConfig;
use crate::event::GameEvent;
use crate::game_loop::{LoopHandle, RenderLoop};
use crate::level::Level;
use crate::logic::LogicGame;
use crate::GameError;

/// A game that renders its world and GUI
pub struct Game<B: RenderBackend = HeadlessBackend> {
    logic: LogicGame<ResourceManager>,
    camera: Camera,
    gui: GuiManager,
    world_renderer: Option<WorldRenderer>,
    backend: B,
    render_loop: RenderLoop,
    default_gui_handler: bool,
}

impl Game<HeadlessBackend> {
    /// Game drawing into an in-memory frame buffer
    pub fn new(config: &AppConfig) -> Self {
        let backend = HeadlessBackend::new(config.render.width, config.render.height)
            .with_history(config.render.frame_history);
        Self::with_backend(config, backend)
    }
}

impl<B: RenderBackend> Game<B> {
    pub fn with_backend(config: &AppConfig, backend: B) -> Self {
        let resources = ResourceManager::new(config.game.tile_size, config.render.scale);
        let camera = Camera::new(Vec2::new(config.render.viewport[0], config.render.viewport[1]));
        Self {
            logic: LogicGame::with_resources(resources, config),
            gui: GuiManager::new(camera.viewport()),
            camera,
            world_renderer: None,
            backend,
            render_loop: RenderLoop::new(config.game.tick_per_second, config.game.frame_per_second),
            default_gui_handler: config.game.default_gui_handler,
        }
    }

    pub fn logic(&self) -> &LogicGame<ResourceManager> {
        &self.logic
    }

    /// The logic game, where world and input handlers are registered
    pub fn logic_mut(&mut self) -> &mut LogicGame<ResourceManager> {
        &mut self.logic
    }

    pub fn resources(&self) -> &ResourceManager {
        self.logic.resources()
    }

    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        self.logic.resources_mut()
    }

    pub fn world(&self) -> &World {
        self.logic.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.logic.world_mut()
    }

    pub fn input_mut(&mut self) -> &mut InputHandler {
        self.logic.input_mut()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn gui(&self) -> &GuiManager {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut GuiManager {
        &mut self.gui
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn tick(&self) -> u64 {
        self.render_loop.tick()
    }

    pub fn frame(&self) -> u64 {
        self.render_loop.frame()
    }

    pub fn handle(&self) -> LoopHandle {
        self.render_loop.handle()
    }

    pub fn change_world(&mut self, tiles: TileMap, background: Option<String>, logic_area: Option<Aabb>) {
        self.logic.change_world(tiles, background, logic_area);
        self.world_renderer = Some(WorldRenderer::new(self.logic.resources(), self.logic.world()));
    }

    pub fn load_level(&mut self, level: &Level) -> Result<(), GameError> {
        self.logic.load_level(level)?;
        self.world_renderer = Some(WorldRenderer::new(self.logic.resources(), self.logic.world()));
        Ok(())
    }

    /// Run one logic tick
    ///
    /// Once the queue handlers saw them, left clicks move the GUI focus and
    /// typed keys go to the focused component. Canceled events are skipped.
    pub fn update(&mut self, tick: u64) -> Result<(), GameError> {
        self.logic.update_world(tick)?;

        for event in self.logic.fire_input_events(tick) {
            if !self.default_gui_handler || event.is_canceled() {
                continue;
            }
            match event.action {
                InputAction::KeyTyped { key } => {
                    self.gui.type_key(key);
                }
                _ => {
                    self.gui.handle_click(&event);
                }
            }
        }

        let mut focus_changes = Vec::new();
        self.gui.fire_events(tick, |event| focus_changes.push(event));
        for event in focus_changes {
            self.logic.fire_event(GameEvent::Gui(event));
        }
        Ok(())
    }

    /// Draw the world then the GUI and hand the frame to the backend
    pub fn render(&mut self, index: u64) -> Result<(), GameError> {
        let mut frame = Frame::new(index);
        let (resources, world) = self.logic.split_mut();
        if let Some(renderer) = self.world_renderer.as_mut() {
            renderer.render(resources, world, &self.camera, &mut frame)?;
        }
        frame.extend(self.gui.render(resources)?);
        self.backend.submit(frame, resources)?;
        Ok(())
    }

    /// Run the logic and render loops
    pub fn run(&mut self, ticks: Option<u64>, max_speed: bool) -> Result<(), GameError> {
        let mut render_loop = self.render_loop.clone();
        let result = render_loop.run(
            self,
            ticks,
            max_speed,
            |game, tick| game.update(tick),
            |game, frame| game.render(frame),
        );
        self.render_loop = render_loop;
        result
    }

    pub fn stop(&self) {
        self.render_loop.stop();
    }

    /// Register a handler for every GUI focus change
    pub fn register_gui_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &GuiEvent) + 'static,
    {
        self.register_gui_kind_handler(GuiKind::Gui, handler);
    }

    pub fn register_focused_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &GuiEvent) + 'static,
    {
        self.register_gui_kind_handler(GuiKind::Focused, handler);
    }

    pub fn register_unfocused_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut World, &GuiEvent) + 'static,
    {
        self.register_gui_kind_handler(GuiKind::Unfocused, handler);
    }

    fn register_gui_kind_handler<F>(&mut self, kind: GuiKind, mut handler: F)
    where
        F: FnMut(&mut World, &GuiEvent) + 'static,
    {
        self.logic.register_event_handler(kind.into(), move |world, event| {
            if let GameEvent::Gui(gui) = event {
                handler(world, gui);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tilekit_input::{Key, MouseButton};
    use tilekit_math::Rect;
    use tilekit_render::gui::{GuiComponent, GuiFont};

    fn font() -> GuiFont {
        GuiFont::new("font", " abc", 8.0, 8.0)
    }

    /// Game with a 320×240 GUI and one text field at (10, 10)
    fn game_with_field() -> (Game, tilekit_render::ComponentKey) {
        let mut game = Game::new(&AppConfig::default());
        let field = game.gui_mut().add(GuiComponent::text_field(
            Rect::new(Vec2::new(10.0, 10.0), Vec2::new(100.0, 10.0)),
            "",
            font(),
        ));
        (game, field)
    }

    /// Click at a GUI point, pressing on `tick` and releasing on the next one
    fn click(game: &mut Game, tick: u64, x: f32, y: f32) {
        game.input_mut().move_mouse(Vec2::new(x / 160.0 - 1.0, y / 120.0 - 1.0));
        game.input_mut().mouse_button_press(MouseButton::Left);
        game.update(tick).unwrap();
        game.input_mut().mouse_button_release(MouseButton::Left);
        game.update(tick + 1).unwrap();
    }

    fn type_key(game: &mut Game, tick: u64, key: Key) {
        game.input_mut().key_press(key);
        game.update(tick).unwrap();
        game.input_mut().key_release(key);
        game.update(tick + 1).unwrap();
    }

    #[test]
    fn test_click_focuses_and_typing_fills_field() {
        let (mut game, field) = game_with_field();
        let focused = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&focused);
        game.register_focused_handler(move |_, event| seen.borrow_mut().push((event.tick, event.component)));

        click(&mut game, 0, 20.0, 15.0);
        assert_eq!(game.gui().focused(), Some(field));
        assert_eq!(*focused.borrow(), vec![(1, field)]);

        type_key(&mut game, 2, Key::A);
        type_key(&mut game, 4, Key::B);
        assert_eq!(game.gui().get(field).unwrap().text(), Some("ab"));
    }

    #[test]
    fn test_click_outside_unfocuses() {
        let (mut game, field) = game_with_field();
        let unfocused = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&unfocused);
        game.register_unfocused_handler(move |_, _| *seen.borrow_mut() += 1);

        click(&mut game, 0, 20.0, 15.0);
        click(&mut game, 2, 200.0, 200.0);
        assert_eq!(game.gui().focused(), None);
        assert!(!game.gui().get(field).unwrap().focused);
        assert_eq!(*unfocused.borrow(), 1);
    }

    #[test]
    fn test_canceled_click_keeps_focus_unchanged() {
        let (mut game, _) = game_with_field();
        game.logic_mut().register_mouse_button_clicked_handler(|_, event| event.cancel());

        click(&mut game, 0, 20.0, 15.0);
        assert_eq!(game.gui().focused(), None);
    }

    #[test]
    fn test_gui_handler_disabled() {
        let mut config = AppConfig::default();
        config.game.default_gui_handler = false;
        let mut game = Game::new(&config);
        game.gui_mut().add(GuiComponent::text_field(
            Rect::new(Vec2::new(10.0, 10.0), Vec2::new(100.0, 10.0)),
            "",
            font(),
        ));

        click(&mut game, 0, 20.0, 15.0);
        assert_eq!(game.gui().focused(), None);
    }

    #[test]
    fn test_run_renders_frames() {
        let mut config = AppConfig::default();
        config.render.width = 32;
        config.render.height = 24;
        config.game.frame_per_second = 1e9;
        let mut game = Game::new(&config);
        game.change_world(TileMap::new(4, 4), None, None);

        game.run(Some(5), true).unwrap();
        assert_eq!(game.tick(), 5);
        assert!(game.frame() >= 1);
        assert!(game.backend().last_frame().is_some());
        assert_eq!(game.backend().frame_buffer().dimensions(), (32, 24));
    }
}
