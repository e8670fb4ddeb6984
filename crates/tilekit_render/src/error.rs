//! Render error types

use std::fmt;

/// Error raised while registering resources or building frames
#[derive(Debug)]
pub enum RenderError {
    /// No sprite set registered under this name
    UnknownSpriteSet(String),
    /// Sprite set has no animation with this index
    UnknownAnimation { sprite_set: String, animation: usize },
    /// Animation frame refers to a texture index the sprite set lacks
    UnknownTexture { sprite_set: String, texture: usize },
    /// No background registered under this name
    UnknownBackground(String),
    /// Background layer refers to an unregistered background texture
    UnknownBackgroundTexture(usize),
    /// Tile set grid larger than 65536 tiles or with an empty side
    InvalidTileSet { width: u32, height: u32 },
    /// No GUI component with this key
    UnknownComponent,
    /// The GUI component cannot hold children
    NotAContainer,
    /// Image decoding or encoding failure
    Image(image::ImageError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownSpriteSet(name) => write!(f, "Unknown sprite set: {}", name),
            RenderError::UnknownAnimation { sprite_set, animation } => {
                write!(f, "Sprite set {} has no animation {}", sprite_set, animation)
            }
            RenderError::UnknownTexture { sprite_set, texture } => {
                write!(f, "Sprite set {} has no texture {}", sprite_set, texture)
            }
            RenderError::UnknownBackground(name) => write!(f, "Unknown background: {}", name),
            RenderError::UnknownBackgroundTexture(index) => write!(f, "Unknown background texture: {}", index),
            RenderError::InvalidTileSet { width, height } => write!(
                f,
                "Invalid tile set {}x{}: at most 65536 tiles and at least one per side",
                width, height
            ),
            RenderError::UnknownComponent => write!(f, "Unknown GUI component"),
            RenderError::NotAContainer => write!(f, "GUI component is not a container"),
            RenderError::Image(e) => write!(f, "Image error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Image(e)
    }
}
