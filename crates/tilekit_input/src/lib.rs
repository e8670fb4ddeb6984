//! Keyboard and mouse input for tilekit
//!
//! The [`InputHandler`] tracks device state and emits [`InputEvent`]s once
//! per tick. Inputs can be recorded to JSON and replayed later.

mod error;
mod events;
mod handler;
mod key;
mod record;
mod window;

pub use error::InputError;
pub use events::{InputAction, InputEvent, InputKind};
pub use handler::{InputConfig, InputHandler};
pub use key::{Key, MouseButton};
pub use record::{InputRecord, InputRecorder, InputReplay, RawInput};
pub use window::{key_from_winit, mouse_button_from_winit, normalize_cursor};
