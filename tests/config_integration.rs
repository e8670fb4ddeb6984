//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tilekit::config::AppConfig;

/// Fresh config directory under the system temp dir
fn config_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tilekit_config_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

// ==================== File Tests ====================

/// The shipped default.toml matches the built-in defaults
#[test]
#[serial]
fn test_default_file_matches_defaults() {
    let config = AppConfig::load().unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.game, defaults.game);
    assert_eq!(config.physics, defaults.physics);
    assert_eq!(config.input, defaults.input);
    assert_eq!(config.events, defaults.events);
    assert_eq!(config.render, defaults.render);
}

/// user.toml overrides default.toml key by key
#[test]
#[serial]
fn test_user_overrides_default() {
    let dir = config_dir("user");
    fs::write(dir.join("default.toml"), "[game]\ntile_size = 8\ntick_per_second = 30.0\n").unwrap();
    fs::write(dir.join("user.toml"), "[game]\ntile_size = 32\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.game.tile_size, 32);
    assert_eq!(config.game.tick_per_second, 30.0);
    fs::remove_dir_all(&dir).unwrap();
}

/// A missing directory yields the built-in defaults
#[test]
#[serial]
fn test_missing_directory() {
    let dir = std::env::temp_dir().join("tilekit_config_does_not_exist");
    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.game.tile_size, 16);
    assert!(config.physics.safe_mode);
}

/// Wrong value types are reported
#[test]
#[serial]
fn test_invalid_value() {
    let dir = config_dir("invalid");
    fs::write(dir.join("default.toml"), "[game]\ntile_size = \"big\"\n").unwrap();

    let error = AppConfig::load_from(&dir).unwrap_err();
    assert!(error.to_string().contains("Configuration error"));
    fs::remove_dir_all(&dir).unwrap();
}

// ==================== Environment Tests ====================

/// TK_SECTION__KEY overrides the files
#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("TK_GAME__TILE_SIZE", "24");
    std::env::set_var("TK_PHYSICS__MULTI_THREADING", "false");
    let config = AppConfig::load();
    std::env::remove_var("TK_GAME__TILE_SIZE");
    std::env::remove_var("TK_PHYSICS__MULTI_THREADING");

    let config = config.unwrap();
    assert_eq!(config.game.tile_size, 24);
    assert!(!config.physics.multi_threading);
}

/// Optional keys can be set from the environment
#[test]
#[serial]
fn test_env_sets_optional_value() {
    std::env::set_var("TK_GAME__TICKS", "120");
    let config = AppConfig::load();
    std::env::remove_var("TK_GAME__TICKS");

    assert_eq!(config.unwrap().game.ticks, Some(120));
}
