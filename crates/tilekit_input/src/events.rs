//! Input events

use tilekit_events::{Event, EventKind};
use tilekit_math::Vec2;

use crate::{Key, MouseButton};

/// Kinds of input events
///
/// ```text
/// Input
/// ├── Key: KeyPressed, KeyReleased, KeyTyped, KeyHeld
/// └── Mouse: MouseMoved
///     └── MouseButton: MouseButtonPressed, MouseButtonReleased,
///                      MouseButtonClicked, MouseDragged
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Input,
    Key,
    KeyPressed,
    KeyReleased,
    KeyTyped,
    KeyHeld,
    Mouse,
    MouseMoved,
    MouseButton,
    MouseButtonPressed,
    MouseButtonReleased,
    MouseButtonClicked,
    MouseDragged,
}

impl EventKind for InputKind {
    fn parent(self) -> Option<Self> {
        use InputKind::*;
        match self {
            Input => None,
            Key | Mouse => Some(Input),
            KeyPressed | KeyReleased | KeyTyped | KeyHeld => Some(Key),
            MouseMoved | MouseButton => Some(Mouse),
            MouseButtonPressed | MouseButtonReleased | MouseButtonClicked | MouseDragged => Some(MouseButton),
        }
    }
}

/// What happened
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputAction {
    KeyPressed { key: Key },
    KeyReleased { key: Key },
    /// Released quickly enough to count as typing
    KeyTyped { key: Key },
    /// Still down; `duration` counts the ticks since the press
    KeyHeld { key: Key, duration: u32 },
    MouseMoved { position: Vec2 },
    MouseButtonPressed { button: MouseButton, position: Vec2 },
    MouseButtonReleased { button: MouseButton, position: Vec2 },
    /// Released quickly enough to count as a click
    MouseButtonClicked { button: MouseButton, position: Vec2 },
    /// Moved while the button is down
    MouseDragged { button: MouseButton, position: Vec2, duration: u32 },
}

/// A user input, cancelable by handlers
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent {
    pub tick: u64,
    pub action: InputAction,
    canceled: bool,
}

impl InputEvent {
    pub fn new(tick: u64, action: InputAction) -> Self {
        Self {
            tick,
            action,
            canceled: false,
        }
    }

    /// Stop later handlers from seeing this event
    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    /// Key of a key event
    pub fn key(&self) -> Option<Key> {
        match self.action {
            InputAction::KeyPressed { key }
            | InputAction::KeyReleased { key }
            | InputAction::KeyTyped { key }
            | InputAction::KeyHeld { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Button of a mouse button event
    pub fn button(&self) -> Option<MouseButton> {
        match self.action {
            InputAction::MouseButtonPressed { button, .. }
            | InputAction::MouseButtonReleased { button, .. }
            | InputAction::MouseButtonClicked { button, .. }
            | InputAction::MouseDragged { button, .. } => Some(button),
            _ => None,
        }
    }

    /// Pointer position of a mouse event
    pub fn position(&self) -> Option<Vec2> {
        match self.action {
            InputAction::MouseMoved { position }
            | InputAction::MouseButtonPressed { position, .. }
            | InputAction::MouseButtonReleased { position, .. }
            | InputAction::MouseButtonClicked { position, .. }
            | InputAction::MouseDragged { position, .. } => Some(position),
            _ => None,
        }
    }
}

impl Event for InputEvent {
    type Kind = InputKind;

    fn tick(&self) -> u64 {
        self.tick
    }

    fn kind(&self) -> InputKind {
        match self.action {
            InputAction::KeyPressed { .. } => InputKind::KeyPressed,
            InputAction::KeyReleased { .. } => InputKind::KeyReleased,
            InputAction::KeyTyped { .. } => InputKind::KeyTyped,
            InputAction::KeyHeld { .. } => InputKind::KeyHeld,
            InputAction::MouseMoved { .. } => InputKind::MouseMoved,
            InputAction::MouseButtonPressed { .. } => InputKind::MouseButtonPressed,
            InputAction::MouseButtonReleased { .. } => InputKind::MouseButtonReleased,
            InputAction::MouseButtonClicked { .. } => InputKind::MouseButtonClicked,
            InputAction::MouseDragged { .. } => InputKind::MouseDragged,
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled
    }
}
