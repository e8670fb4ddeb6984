//! Sprite sets and the tile set

use crate::{RenderError, TextureId};

/// Frames of an animation and how many render frames each one lasts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Animation {
    /// Frames per texture; 0 for a static animation
    pub period: u32,
    /// Indices into the sprite set textures
    pub frames: Vec<usize>,
}

impl Animation {
    /// Render frames needed to play the whole animation once
    pub fn length(&self) -> u32 {
        self.period * self.frames.len() as u32
    }
}

/// Textures and animations of one kind of sprite
#[derive(Clone, Debug, Default)]
pub struct SpriteSet {
    name: String,
    textures: Vec<TextureId>,
    animations: Vec<Animation>,
}

impl SpriteSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a texture, returning its index within the set
    pub fn register_sprite_texture(&mut self, texture: TextureId) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// Append an animation, returning its index within the set
    pub fn register_sprite_animation(&mut self, period: u32, frames: Vec<usize>) -> usize {
        self.animations.push(Animation { period, frames });
        self.animations.len() - 1
    }

    pub fn animation(&self, animation: usize) -> Option<&Animation> {
        self.animations.get(animation)
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Texture to draw and the pointer to use next frame
    ///
    /// Static animations and pointers past the end show the first frame and
    /// reset the pointer. The pointer wraps to 0 after the last frame.
    pub fn get_texture(&self, animation: usize, pointer: u32) -> Result<(u32, TextureId), RenderError> {
        let anim = self.animations.get(animation).ok_or_else(|| RenderError::UnknownAnimation {
            sprite_set: self.name.clone(),
            animation,
        })?;
        let length = anim.length();

        if anim.period == 0 || pointer >= length {
            let first = *anim.frames.first().ok_or_else(|| RenderError::UnknownAnimation {
                sprite_set: self.name.clone(),
                animation,
            })?;
            return Ok((0, self.texture(first)?));
        }

        let texture = self.texture(anim.frames[(pointer / anim.period) as usize])?;
        let next = if pointer == length - 1 { 0 } else { pointer + 1 };
        Ok((next, texture))
    }

    fn texture(&self, index: usize) -> Result<TextureId, RenderError> {
        self.textures.get(index).copied().ok_or_else(|| RenderError::UnknownTexture {
            sprite_set: self.name.clone(),
            texture: index,
        })
    }
}

/// Largest number of tiles a tile set can address
pub const MAX_TILE_SET_SIZE: u32 = 65536;

/// A texture holding every tile texture in a `width × height` grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSet {
    pub texture: TextureId,
    pub width: u32,
    pub height: u32,
}

impl TileSet {
    pub fn new(texture: TextureId, width: u32, height: u32) -> Result<Self, RenderError> {
        let too_large = width.checked_mul(height).map_or(true, |size| size > MAX_TILE_SET_SIZE);
        if too_large || width == 0 || height == 0 {
            return Err(RenderError::InvalidTileSet { width, height });
        }
        Ok(Self { texture, width, height })
    }

    /// Top-left corner of tile `index` in texture coordinates
    pub fn tile_origin(&self, index: u32) -> (f32, f32) {
        let column = index % self.width;
        let row = index / self.width;
        (column as f32 / self.width as f32, row as f32 / self.height as f32)
    }
}
