//! Game error type

use std::fmt;

use tilekit_input::InputError;
use tilekit_physics::PhysicsError;
use tilekit_render::RenderError;

use crate::config::ConfigError;
use crate::level::LevelError;

/// Any error raised while running a game
#[derive(Debug)]
pub enum GameError {
    Physics(PhysicsError),
    Input(InputError),
    Render(RenderError),
    Level(LevelError),
    Config(ConfigError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Physics(e) => write!(f, "Physics error: {}", e),
            GameError::Input(e) => write!(f, "Input error: {}", e),
            GameError::Render(e) => write!(f, "Render error: {}", e),
            GameError::Level(e) => write!(f, "Level error: {}", e),
            GameError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Physics(e) => Some(e),
            GameError::Input(e) => Some(e),
            GameError::Render(e) => Some(e),
            GameError::Level(e) => Some(e),
            GameError::Config(e) => Some(e),
        }
    }
}

impl From<PhysicsError> for GameError {
    fn from(e: PhysicsError) -> Self {
        GameError::Physics(e)
    }
}

impl From<InputError> for GameError {
    fn from(e: InputError) -> Self {
        GameError::Input(e)
    }
}

impl From<RenderError> for GameError {
    fn from(e: RenderError) -> Self {
        GameError::Render(e)
    }
}

impl From<LevelError> for GameError {
    fn from(e: LevelError) -> Self {
        GameError::Level(e)
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::Config(e)
    }
}
