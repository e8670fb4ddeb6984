//! Graphical resources
//!
//! The resource manager owns the tile manager used by the logic, next to
//! every texture, the tile set, backgrounds and sprite sets. It should be
//! filled before a world is rendered.

use std::collections::HashMap;
use std::path::Path;

use tilekit_math::{Projection, Vec2};
use tilekit_physics::{CollisionMap, PhysicsError, Sprite, TileId, TileManager};

use crate::{DrawCommand, DrawLayer, RenderError, SpriteSet, Texture, TextureId, TileSet};

/// One parallax layer of a background
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundLayer {
    /// Index into the background textures
    pub texture: usize,
    /// Layer speed over camera speed; 0 is static, 1 follows the camera
    pub ratio: Vec2,
}

/// Textures, sprite sets, backgrounds and tiles used for rendering
#[derive(Debug)]
pub struct ResourceManager {
    tiles: TileManager,
    scale: f32,
    textures: Vec<Texture>,
    tile_set: Option<TileSet>,
    sprite_sets: HashMap<String, SpriteSet>,
    background_textures: Vec<TextureId>,
    backgrounds: HashMap<String, Vec<BackgroundLayer>>,
}

impl ResourceManager {
    /// `scale` multiplies world units into camera units
    pub fn new(tile_size: i32, scale: f32) -> Self {
        Self {
            tiles: TileManager::new(tile_size),
            scale,
            textures: Vec::new(),
            tile_set: None,
            sprite_sets: HashMap::new(),
            background_textures: Vec::new(),
            backgrounds: HashMap::new(),
        }
    }

    pub fn tile_manager(&self) -> &TileManager {
        &self.tiles
    }

    pub fn tile_manager_mut(&mut self) -> &mut TileManager {
        &mut self.tiles
    }

    pub fn tile_size(&self) -> i32 {
        self.tiles.tile_size()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn register_collision_map(&mut self, collision_map: CollisionMap) -> usize {
        self.tiles.register_collision_map(collision_map)
    }

    pub fn register_tile(&mut self, collision_map: usize, texture: usize) -> Result<TileId, PhysicsError> {
        self.tiles.register_tile(collision_map, texture)
    }

    /// Store a texture, returning its id
    pub fn register_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }

    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureId, RenderError> {
        Ok(self.register_texture(Texture::load(path)?))
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id.0)
    }

    /// Use `texture` as a `width × height` grid of tile textures
    pub fn register_tile_set(&mut self, texture: Texture, width: u32, height: u32) -> Result<TileSet, RenderError> {
        let id = self.register_texture(texture);
        let tile_set = TileSet::new(id, width, height)?;
        self.tile_set = Some(tile_set);
        Ok(tile_set)
    }

    pub fn tile_set(&self) -> Option<TileSet> {
        self.tile_set
    }

    /// Create an empty background; layers are stacked in registration order
    pub fn register_background(&mut self, name: impl Into<String>) {
        self.backgrounds.insert(name.into(), Vec::new());
    }

    pub fn register_background_texture(&mut self, texture: Texture) -> usize {
        let id = self.register_texture(texture);
        self.background_textures.push(id);
        self.background_textures.len() - 1
    }

    pub fn register_background_layer(
        &mut self,
        name: &str,
        texture: usize,
        ratio_x: f32,
        ratio_y: f32,
    ) -> Result<(), RenderError> {
        if texture >= self.background_textures.len() {
            return Err(RenderError::UnknownBackgroundTexture(texture));
        }
        let layers = self
            .backgrounds
            .get_mut(name)
            .ok_or_else(|| RenderError::UnknownBackground(name.to_string()))?;
        layers.push(BackgroundLayer {
            texture,
            ratio: Vec2::new(ratio_x, ratio_y),
        });
        Ok(())
    }

    pub fn has_background(&self, name: &str) -> bool {
        self.backgrounds.contains_key(name)
    }

    pub fn register_sprite_set(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.sprite_sets.insert(name.clone(), SpriteSet::new(name));
    }

    pub fn register_sprite_texture(&mut self, sprite_set: &str, texture: Texture) -> Result<usize, RenderError> {
        if !self.sprite_sets.contains_key(sprite_set) {
            return Err(RenderError::UnknownSpriteSet(sprite_set.to_string()));
        }
        let id = self.register_texture(texture);
        Ok(self.sprite_set_mut(sprite_set)?.register_sprite_texture(id))
    }

    pub fn register_sprite_animation(
        &mut self,
        sprite_set: &str,
        period: u32,
        frames: Vec<usize>,
    ) -> Result<usize, RenderError> {
        Ok(self.sprite_set_mut(sprite_set)?.register_sprite_animation(period, frames))
    }

    pub fn sprite_set(&self, name: &str) -> Result<&SpriteSet, RenderError> {
        self.sprite_sets
            .get(name)
            .ok_or_else(|| RenderError::UnknownSpriteSet(name.to_string()))
    }

    fn sprite_set_mut(&mut self, name: &str) -> Result<&mut SpriteSet, RenderError> {
        self.sprite_sets
            .get_mut(name)
            .ok_or_else(|| RenderError::UnknownSpriteSet(name.to_string()))
    }

    /// Full-screen quads for every layer of a background
    ///
    /// Each layer is tiled over the screen and scrolled by the camera
    /// position times its ratio, wrapping every screen size.
    pub fn background_commands(
        &self,
        name: &str,
        camera_position: Vec2,
        camera_size: Vec2,
    ) -> Result<Vec<DrawCommand>, RenderError> {
        let layers = self
            .backgrounds
            .get(name)
            .ok_or_else(|| RenderError::UnknownBackground(name.to_string()))?;

        let mut commands = Vec::new();
        for layer in layers {
            let texture = *self
                .background_textures
                .get(layer.texture)
                .ok_or(RenderError::UnknownBackgroundTexture(layer.texture))?;

            let offset = (-camera_position * self.scale)
                .mul_components(layer.ratio)
                .rem_euclid(camera_size)
                .div_components(camera_size);

            let first_x = if offset.x == 0.0 { 0 } else { -1 };
            let first_y = if offset.y == 0.0 { 0 } else { -1 };
            for i in first_x..1 {
                for j in first_y..1 {
                    let position = Projection::new()
                        .translate(offset + Vec2::new(i as f32, j as f32))
                        .scale(Vec2::new(2.0, 2.0));
                    commands.push(DrawCommand::quad(DrawLayer::Background, texture, position, Projection::new()));
                }
            }
        }
        Ok(commands)
    }

    /// Quad for a sprite of an object at `position`, advancing its animation
    pub fn sprite_command(
        &self,
        sprite: &mut Sprite,
        position: Vec2,
        camera_position_matrix: &Projection,
        camera_projection: &Projection,
    ) -> Result<DrawCommand, RenderError> {
        let (pointer, texture) = self
            .sprite_set(&sprite.sprite_set)?
            .get_texture(sprite.current_animation(), sprite.animation_pointer())?;

        let bounds = Vec2::from(sprite.texture_bounds.bounds);
        let offset = Vec2::from(sprite.texture_bounds.position);
        let flip = Vec2::new(
            if sprite.flip_horizontally { -1.0 } else { 1.0 },
            if sprite.flip_vertically { -1.0 } else { 1.0 },
        );

        let placement = Projection::new()
            .scale(bounds.mul_components(flip))
            .rotate(sprite.angle)
            .translate(position + bounds / 2.0 + offset)
            .scale(Vec2::new(-1.0, 1.0))
            .dot(&camera_position_matrix.matrix)
            .scale(Vec2::new(self.scale, self.scale));

        sprite.set_animation_pointer(pointer);
        Ok(DrawCommand::quad(DrawLayer::Sprite, texture, placement, *camera_projection))
    }

    /// Advance the animation of a sprite that is not drawn this frame
    pub fn increment_animation_pointer(&self, sprite: &mut Sprite) -> Result<(), RenderError> {
        let (pointer, _) = self
            .sprite_set(&sprite.sprite_set)?
            .get_texture(sprite.current_animation(), sprite.animation_pointer())?;
        sprite.set_animation_pointer(pointer);
        Ok(())
    }
}

impl AsRef<TileManager> for ResourceManager {
    fn as_ref(&self) -> &TileManager {
        &self.tiles
    }
}

impl AsMut<TileManager> for ResourceManager {
    fn as_mut(&mut self) -> &mut TileManager {
        &mut self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilekit_physics::Aabb;

    fn resources() -> ResourceManager {
        let mut resources = ResourceManager::new(16, 1.0);
        resources.register_sprite_set("coin");
        resources
            .register_sprite_texture("coin", Texture::solid(1, 1, [255, 255, 0, 255]))
            .unwrap();
        resources
            .register_sprite_texture("coin", Texture::solid(1, 1, [255, 128, 0, 255]))
            .unwrap();
        resources.register_sprite_animation("coin", 1, vec![0, 1]).unwrap();
        resources
    }

    #[test]
    fn test_unknown_sprite_set() {
        let mut resources = resources();
        let result = resources.register_sprite_texture("ghost", Texture::solid(1, 1, [0; 4]));
        assert!(matches!(result, Err(RenderError::UnknownSpriteSet(name)) if name == "ghost"));
    }

    #[test]
    fn test_sprite_command_advances_animation() {
        let resources = resources();
        let mut sprite = Sprite::new(Aabb::from_coords(0, 0, 8, 8), "coin", 0);

        let first = resources
            .sprite_command(&mut sprite, Vec2::ZERO, &Projection::new(), &Projection::new())
            .unwrap();
        assert_eq!(first.texture(), Some(TextureId(0)));
        assert_eq!(sprite.animation_pointer(), 1);

        let second = resources
            .sprite_command(&mut sprite, Vec2::ZERO, &Projection::new(), &Projection::new())
            .unwrap();
        assert_eq!(second.texture(), Some(TextureId(1)));
        assert_eq!(sprite.animation_pointer(), 0);
    }

    #[test]
    fn test_sprite_placement() {
        let resources = resources();
        let mut sprite = Sprite::new(Aabb::from_coords(0, 0, 8, 8), "coin", 0);
        let command = resources
            .sprite_command(&mut sprite, Vec2::new(10.0, 20.0), &Projection::new(), &Projection::new())
            .unwrap();

        // x is mirrored for the camera projection
        let centre = command.instance().corners();
        let mid = (centre[0] + centre[2]) / 2.0;
        assert_eq!(mid, Vec2::new(-14.0, 24.0));
    }

    #[test]
    fn test_increment_for_culled_sprite() {
        let resources = resources();
        let mut sprite = Sprite::new(Aabb::from_coords(0, 0, 8, 8), "coin", 0);
        resources.increment_animation_pointer(&mut sprite).unwrap();
        assert_eq!(sprite.animation_pointer(), 1);
    }

    #[test]
    fn test_background_tiles_when_scrolled() {
        let mut resources = resources();
        resources.register_background("sky");
        let texture = resources.register_background_texture(Texture::solid(1, 1, [0, 0, 255, 255]));
        resources.register_background_layer("sky", texture, 0.5, 0.0).unwrap();

        let size = Vec2::new(100.0, 50.0);
        let still = resources.background_commands("sky", Vec2::ZERO, size).unwrap();
        assert_eq!(still.len(), 1);

        let scrolled = resources.background_commands("sky", Vec2::new(20.0, 0.0), size).unwrap();
        assert_eq!(scrolled.len(), 2);
        assert!(scrolled.iter().all(|c| c.layer() == DrawLayer::Background));
    }

    #[test]
    fn test_unknown_background() {
        let mut resources = resources();
        assert!(matches!(
            resources.background_commands("void", Vec2::ZERO, Vec2::new(1.0, 1.0)),
            Err(RenderError::UnknownBackground(_))
        ));
        resources.register_background("void");
        assert!(matches!(
            resources.register_background_layer("void", 3, 1.0, 1.0),
            Err(RenderError::UnknownBackgroundTexture(3))
        ));
    }
}
