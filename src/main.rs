//! tilekit demo
//!
//! Loads the configured level and plays it headless: a fixed number of
//! ticks when `game.ticks` is set, otherwise until every entity is at rest
//! or `DEMO_TICK_LIMIT` ticks went by. The last frame can be saved as an
//! image.

use tilekit::math::IVec2;
use tilekit::physics::World;
use tilekit::render::{ResourceManager, Texture};
use tilekit::{AppConfig, Game, GameError, Level};

/// Ticks played when no tick count is configured
const DEMO_TICK_LIMIT: u64 = 600;

const SKY: [u8; 4] = [110, 170, 230, 255];
const GROUND: [u8; 4] = [120, 85, 50, 255];
const HERO: [u8; 4] = [220, 40, 40, 255];
const HERO_BLINK: [u8; 4] = [250, 200, 60, 255];

/// Placeholder art so the demo runs without asset files
fn register_demo_resources(resources: &mut ResourceManager) -> Result<(), GameError> {
    resources.register_tile_set(Texture::solid(32, 16, GROUND), 2, 1)?;

    resources.register_background("sky");
    let sky = resources.register_background_texture(Texture::solid(1, 1, SKY));
    resources.register_background_layer("sky", sky, 0.0, 0.0)?;

    resources.register_sprite_set("hero");
    let still = resources.register_sprite_texture("hero", Texture::solid(1, 1, HERO))?;
    let blink = resources.register_sprite_texture("hero", Texture::solid(1, 1, HERO_BLINK))?;
    resources.register_sprite_animation("hero", 30, vec![still, still, blink])?;
    Ok(())
}

fn at_rest(world: &World) -> bool {
    world
        .objects()
        .iter()
        .all(|(_, object)| !object.is_entity() || object.speed() == IVec2::ZERO)
}

/// Play `ticks` ticks, or until every entity came to rest
fn play(game: &mut Game, ticks: Option<u64>, max_speed: bool) -> Result<(), GameError> {
    if let Some(ticks) = ticks {
        return game.run(Some(ticks), max_speed);
    }
    if at_rest(game.world()) {
        log::info!("Every entity is at rest, nothing to play");
        return Ok(());
    }

    // Speeds only change when something collides
    let handle = game.handle();
    game.logic_mut().register_collision_handler(move |world, _| {
        if at_rest(world) {
            log::info!("Every entity is at rest, stopping");
            handle.stop();
        }
    });
    game.run(Some(DEMO_TICK_LIMIT), max_speed)
}

fn run(config: &AppConfig) -> Result<(), GameError> {
    let mut game = Game::new(config);
    register_demo_resources(game.resources_mut())?;

    let level = Level::load(&config.game.level)?;
    game.load_level(&level)?;

    if config.debug.record_inputs.is_some() {
        game.input_mut().record();
    }

    play(&mut game, config.game.ticks, config.game.max_speed)?;
    log::info!("Ran {} ticks and {} frames", game.tick(), game.frame());

    if let Some(path) = &config.debug.record_inputs {
        game.logic().input().export_record(path)?;
        log::info!("Saved input record to {}", path);
    }
    if let Some(path) = &config.debug.save_frame {
        game.backend().save_frame(path)?;
    }
    Ok(())
}

fn main() {
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting tilekit");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
