//! World rendering: background, level, then visible sprites

use std::sync::Arc;

use tilekit_math::{Projection, Vec2};
use tilekit_physics::{TileMap, World};

use crate::{Camera, DrawCommand, Frame, LevelTexture, QuadInstance, RenderError, ResourceManager};

/// Keeps the packed level texture in sync with the world tiles
#[derive(Debug)]
pub struct LevelRenderer {
    tiles: TileMap,
    texture: Arc<LevelTexture>,
    tile_size: i32,
}

impl LevelRenderer {
    pub fn new(tiles: &TileMap, tile_size: i32) -> Self {
        Self {
            tiles: tiles.clone(),
            texture: Arc::new(LevelTexture::encode(tiles)),
            tile_size,
        }
    }

    pub fn texture(&self) -> &Arc<LevelTexture> {
        &self.texture
    }

    /// Re-encode the level texture if the tiles changed
    pub fn update_tiles(&mut self, tiles: &TileMap) {
        if self.tiles != *tiles {
            log::debug!("Level changed, re-encoding {}x{} tiles", tiles.width(), tiles.height());
            self.tiles = tiles.clone();
            self.texture = Arc::new(LevelTexture::encode(tiles));
        }
    }

    /// Level quad, `None` while no tile set is registered
    pub fn command(&self, resources: &ResourceManager, camera: &Camera) -> Option<DrawCommand> {
        let tile_set = resources.tile_set()?;
        let size = self.tile_size as f32;
        let scale = resources.scale();

        let position = Projection::new()
            .translate(Vec2::new(0.5, 0.5))
            .scale(Vec2::new(
                -size * self.tiles.width() as f32,
                size * self.tiles.height() as f32,
            ))
            .dot(&camera.position_matrix().matrix)
            .scale(Vec2::new(scale, scale));

        Some(DrawCommand::Level {
            level: Arc::clone(&self.texture),
            tile_set,
            instance: QuadInstance::new(position, *camera.projection_matrix()),
        })
    }
}

/// Renders a world through a camera
#[derive(Debug)]
pub struct WorldRenderer {
    level: LevelRenderer,
}

impl WorldRenderer {
    pub fn new(resources: &ResourceManager, world: &World) -> Self {
        Self {
            level: LevelRenderer::new(world.tiles(), resources.tile_size()),
        }
    }

    pub fn level(&self) -> &LevelRenderer {
        &self.level
    }

    /// Append the world to `frame`
    ///
    /// Sprites outside the camera view are not drawn but their animation
    /// still advances.
    pub fn render(
        &mut self,
        resources: &ResourceManager,
        world: &mut World,
        camera: &Camera,
        frame: &mut Frame,
    ) -> Result<(), RenderError> {
        if let Some(background) = world.background() {
            frame.extend(resources.background_commands(background, camera.position(), camera.size())?);
        }

        self.level.update_tiles(world.tiles());
        if let Some(level) = self.level.command(resources, camera) {
            frame.push(level);
        }

        let keys: Vec<_> = world.objects().keys().collect();
        for key in keys {
            let Some(object) = world.get_mut(key) else {
                continue;
            };
            if object.should_be_destroyed() {
                continue;
            }
            let position = Vec2::from(object.position());
            let Some(sprite) = object.sprite.as_mut() else {
                continue;
            };
            if !sprite.visible {
                continue;
            }

            if is_in_view(position, Vec2::from(sprite.texture_bounds.bounds), camera, resources.scale()) {
                frame.push(resources.sprite_command(
                    sprite,
                    position,
                    camera.position_matrix(),
                    camera.projection_matrix(),
                )?);
            } else {
                resources.increment_animation_pointer(sprite)?;
            }
        }
        Ok(())
    }
}

/// Whether a sprite at `position` may overlap the camera view
pub fn is_in_view(position: Vec2, bounds: Vec2, camera: &Camera, scale: f32) -> bool {
    let distance = ((position - camera.position()).abs() - bounds) * scale;
    let viewport = camera.viewport();
    distance.x < viewport.x && distance.y < viewport.y
}
