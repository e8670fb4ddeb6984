//! Events travelling through the game queue

use tilekit_events::{Event, EventKind};
use tilekit_input::{InputEvent, InputKind};
use tilekit_physics::{CollisionEvent, CollisionKind};
use tilekit_render::gui::{GuiEvent, GuiKind};

/// Kinds of game events
///
/// Every kind of the collision, input and GUI hierarchies, under a common
/// [`GameEventKind::Any`] root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameEventKind {
    Any,
    Collision(CollisionKind),
    Input(InputKind),
    Gui(GuiKind),
}

impl EventKind for GameEventKind {
    fn parent(self) -> Option<Self> {
        match self {
            GameEventKind::Any => None,
            GameEventKind::Collision(kind) => Some(kind.parent().map_or(GameEventKind::Any, GameEventKind::Collision)),
            GameEventKind::Input(kind) => Some(kind.parent().map_or(GameEventKind::Any, GameEventKind::Input)),
            GameEventKind::Gui(kind) => Some(kind.parent().map_or(GameEventKind::Any, GameEventKind::Gui)),
        }
    }
}

impl From<CollisionKind> for GameEventKind {
    fn from(kind: CollisionKind) -> Self {
        GameEventKind::Collision(kind)
    }
}

impl From<InputKind> for GameEventKind {
    fn from(kind: InputKind) -> Self {
        GameEventKind::Input(kind)
    }
}

impl From<GuiKind> for GameEventKind {
    fn from(kind: GuiKind) -> Self {
        GameEventKind::Gui(kind)
    }
}

/// Any event fired by a game
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Collision(CollisionEvent),
    Input(InputEvent),
    Gui(GuiEvent),
}

impl GameEvent {
    /// Stop the remaining handlers from seeing the event
    ///
    /// Collisions cannot be canceled: the solver relies on every handler
    /// seeing them.
    pub fn cancel(&mut self) {
        match self {
            GameEvent::Collision(_) => {}
            GameEvent::Input(event) => event.cancel(),
            GameEvent::Gui(event) => event.cancel(),
        }
    }

    pub fn as_collision(&self) -> Option<&CollisionEvent> {
        match self {
            GameEvent::Collision(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&InputEvent> {
        match self {
            GameEvent::Input(event) => Some(event),
            _ => None,
        }
    }

    pub fn as_gui(&self) -> Option<&GuiEvent> {
        match self {
            GameEvent::Gui(event) => Some(event),
            _ => None,
        }
    }
}

impl Event for GameEvent {
    type Kind = GameEventKind;

    fn tick(&self) -> u64 {
        match self {
            GameEvent::Collision(event) => event.tick(),
            GameEvent::Input(event) => event.tick(),
            GameEvent::Gui(event) => event.tick(),
        }
    }

    fn kind(&self) -> GameEventKind {
        match self {
            GameEvent::Collision(event) => GameEventKind::Collision(event.kind()),
            GameEvent::Input(event) => GameEventKind::Input(event.kind()),
            GameEvent::Gui(event) => GameEventKind::Gui(event.kind()),
        }
    }

    fn is_canceled(&self) -> bool {
        match self {
            GameEvent::Collision(event) => event.is_canceled(),
            GameEvent::Input(event) => event.is_canceled(),
            GameEvent::Gui(event) => event.is_canceled(),
        }
    }
}

impl From<CollisionEvent> for GameEvent {
    fn from(event: CollisionEvent) -> Self {
        GameEvent::Collision(event)
    }
}

impl From<InputEvent> for GameEvent {
    fn from(event: InputEvent) -> Self {
        GameEvent::Input(event)
    }
}

impl From<GuiEvent> for GameEvent {
    fn from(event: GuiEvent) -> Self {
        GameEvent::Gui(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_input::{InputAction, Key};

    #[test]
    fn test_kind_hierarchy() {
        let event = GameEvent::from(InputEvent::new(4, InputAction::KeyTyped { key: Key::A }));
        assert!(event.is_kind(GameEventKind::Any));
        assert!(event.is_kind(InputKind::Input.into()));
        assert!(event.is_kind(InputKind::Key.into()));
        assert!(event.is_kind(InputKind::KeyTyped.into()));
        assert!(!event.is_kind(InputKind::KeyPressed.into()));
        assert!(!event.is_kind(CollisionKind::Collision.into()));
        assert_eq!(event.tick(), 4);
    }

    #[test]
    fn test_root_parents() {
        assert_eq!(GameEventKind::Any.parent(), None);
        assert_eq!(GameEventKind::Gui(GuiKind::Gui).parent(), Some(GameEventKind::Any));
        assert_eq!(
            GameEventKind::Gui(GuiKind::Focused).parent(),
            Some(GameEventKind::Gui(GuiKind::Gui))
        );
    }

    #[test]
    fn test_cancel_input() {
        let mut event = GameEvent::from(InputEvent::new(0, InputAction::KeyPressed { key: Key::A }));
        event.cancel();
        assert!(event.is_canceled());
        assert!(event.as_input().is_some());
        assert!(event.as_collision().is_none());
    }
}
