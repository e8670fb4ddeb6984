//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TK_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tilekit_input::InputConfig;
use tilekit_physics::PhysicsConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Game loop configuration
    #[serde(default)]
    pub game: GameConfig,
    /// Collision solver configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Input thresholds
    #[serde(default)]
    pub input: InputConfig,
    /// Event queue configuration
    #[serde(default)]
    pub events: EventsConfig,
    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TK_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // TK_GAME__TILE_SIZE=32 -> game.tile_size = 32
        figment = figment.merge(Env::prefixed("TK_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Game loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of a tile side in world units
    pub tile_size: i32,
    /// Logic ticks per second
    pub tick_per_second: f64,
    /// Rendered frames per second
    pub frame_per_second: f64,
    /// Run ticks back to back, ignoring the tick rate
    pub max_speed: bool,
    /// Stop after this many ticks; run until stopped when absent
    pub ticks: Option<u64>,
    /// Register the default tile collision handler
    pub default_tile_collision_handler: bool,
    /// Register the default entity collision handler
    pub default_entity_collision_handler: bool,
    /// Give the GUI focus on left clicks and route typed keys to text fields
    pub default_gui_handler: bool,
    /// Level file loaded by the demo binary
    pub level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            tick_per_second: 60.0,
            frame_per_second: 60.0,
            max_speed: false,
            ticks: None,
            default_tile_collision_handler: true,
            default_entity_collision_handler: true,
            default_gui_handler: true,
            level: "levels/demo.ron".to_string(),
        }
    }
}

/// Event queue configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Number of fired events kept in the history
    pub history_length: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            history_length: tilekit_events::DEFAULT_HISTORY_LENGTH,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frame buffer width in pixels
    pub width: u32,
    /// Frame buffer height in pixels
    pub height: u32,
    /// World units seen by the camera [width, height]
    pub viewport: [f32; 2],
    /// World to camera unit factor
    pub scale: f32,
    /// Frames kept by the headless backend
    pub frame_history: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            viewport: [320.0, 240.0],
            scale: 1.0,
            frame_history: tilekit_render::DEFAULT_FRAME_HISTORY,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Write the last rendered frame to this image file
    pub save_frame: Option<String>,
    /// Record the inputs of the session to this JSON file
    pub record_inputs: Option<String>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            save_frame: None,
            record_inputs: None,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.game.tile_size, 16);
        assert_eq!(config.input.duration_type, 20);
        assert_eq!(config.events.history_length, 512);
        assert!(config.physics.safe_mode);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("tick_per_second"));
        assert!(toml.contains("entity_per_thread"));
        assert!(toml.contains("duration_click"));
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str("[game]\ntile_size = 32\n").unwrap();
        assert_eq!(config.game.tile_size, 32);
        assert_eq!(config.game.tick_per_second, 60.0);
        assert_eq!(config.render, RenderConfig::default());
    }
}
