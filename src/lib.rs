//! tilekit - tile-based 2D game framework
//!
//! A game is a [`World`](tilekit_physics::World) of tiles and objects,
//! advanced one tick at a time by a fixed-rate loop. Each tick the world
//! moves its entities and reports collisions, then the input handler reports
//! key and mouse events. Everything goes through one event queue whose
//! handlers receive the world.
//!
//! [`LogicGame`] runs the logic alone; [`Game`] adds a camera, a GUI and a
//! render backend on top of it.

pub mod config;
mod error;
mod event;
mod game;
mod game_loop;
pub mod level;
mod logic;

pub use config::{AppConfig, ConfigError};
pub use error::GameError;
pub use event::{GameEvent, GameEventKind};
pub use game::Game;
pub use game_loop::{LogicLoop, LoopHandle, RenderLoop};
pub use level::{Level, LevelError};
pub use logic::{GameQueue, LogicGame};

pub use tilekit_events as events;
pub use tilekit_input as input;
pub use tilekit_math as math;
pub use tilekit_physics as physics;
pub use tilekit_render as render;
