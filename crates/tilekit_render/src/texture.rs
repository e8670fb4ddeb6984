//! CPU-side textures
//!
//! Textures are plain RGBA8 images. The level texture packs a tile map into
//! one RGB pixel per tile so a backend can draw the whole level as a single
//! quad.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use tilekit_physics::{TileMap, EMPTY_TILE};

use crate::RenderError;

/// Index of a texture in a [`ResourceManager`](crate::ResourceManager)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub usize);

/// An RGBA8 image, row 0 at the top
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn from_image(image: DynamicImage) -> Self {
        Self::new(image.to_rgba8())
    }

    /// Single-color texture
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// Decode an image file (PNG, JPEG or BMP)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let image = image::open(path)?;
        log::debug!("Loaded texture {} ({}x{})", path.display(), image.width(), image.height());
        Ok(Self::from_image(image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Nearest-neighbour sample, `(0, 0)` is the top-left corner
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return [0; 4];
        }
        let x = ((u * width as f32).floor().max(0.0) as u32).min(width - 1);
        let y = ((v * height as f32).floor().max(0.0) as u32).min(height - 1);
        self.image.get_pixel(x, y).0
    }
}

/// A tile map packed into one RGB pixel per tile
///
/// Row 0 holds the northmost tiles. For tile `t`, `R` is 255 when the tile
/// is not empty, `G = (t - 1) mod 256` and `B = (t - 1) / 256 mod 256`.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelTexture {
    image: RgbImage,
}

impl LevelTexture {
    pub fn encode(tiles: &TileMap) -> Self {
        let width = tiles.width() as u32;
        let height = tiles.height() as u32;
        let image = RgbImage::from_fn(width, height, |x, row| {
            let y = i64::from(height - 1 - row);
            let tile = tiles.get(i64::from(x), y).unwrap_or(EMPTY_TILE);
            Rgb(encode_tile(tile))
        });
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Tile set index stored at column `x`, row `row`, `None` for empty tiles
    pub fn tile_index(&self, x: u32, row: u32) -> Option<u32> {
        let [r, g, b] = self.image.get_pixel_checked(x, row)?.0;
        (r != 0).then(|| u32::from(g) + 256 * u32::from(b))
    }
}

fn encode_tile(tile: u32) -> [u8; 3] {
    if tile == EMPTY_TILE {
        // (0 - 1) wraps to 255 on both channels
        return [0, 255, 255];
    }
    let index = tile - 1;
    [255, (index % 256) as u8, (index / 256 % 256) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_encoding() {
        assert_eq!(encode_tile(1), [255, 0, 0]);
        assert_eq!(encode_tile(256), [255, 255, 0]);
        assert_eq!(encode_tile(257), [255, 0, 1]);
        assert_eq!(encode_tile(EMPTY_TILE)[0], 0);
    }

    #[test]
    fn test_level_rows_are_flipped() {
        // north row first
        let tiles = TileMap::from_rows(&[vec![0, 3], vec![1, 0]]);
        let level = LevelTexture::encode(&tiles);

        assert_eq!(level.width(), 2);
        assert_eq!(level.height(), 2);
        assert_eq!(level.tile_index(0, 0), None);
        assert_eq!(level.tile_index(1, 0), Some(2));
        assert_eq!(level.tile_index(0, 1), Some(0));
        assert_eq!(level.tile_index(1, 1), None);
        assert_eq!(level.tile_index(2, 0), None);
    }

    #[test]
    fn test_sample_nearest() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let texture = Texture::new(image);

        assert_eq!(texture.sample(0.75, 0.25), [255, 0, 0, 255]);
        assert_eq!(texture.sample(0.25, 0.25), [0, 0, 0, 0]);
        assert_eq!(texture.sample(1.0, 0.0), [255, 0, 0, 255]);
    }
}
