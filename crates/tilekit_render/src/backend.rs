//! Render backends
//!
//! A backend receives finished [`Frame`]s from the render loop. The
//! [`HeadlessBackend`] rasterizes them on the CPU into an RGBA image, which
//! is enough for tests, screenshots and servers without a display.

use std::collections::VecDeque;
use std::path::Path;

use image::{Rgba, RgbaImage};
use tilekit_math::{Mat4, Vec2};

use crate::{DrawCommand, Frame, RenderError, ResourceManager};

/// Something that can present frames
pub trait RenderBackend {
    /// Draw `frame`, whose textures are looked up in `resources`
    fn submit(&mut self, frame: Frame, resources: &ResourceManager) -> Result<(), RenderError>;
}

/// Frames kept by a [`HeadlessBackend`] unless told otherwise
pub const DEFAULT_FRAME_HISTORY: usize = 4;

const CLEAR_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Software rasterizer drawing into an in-memory image
#[derive(Debug)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    history: usize,
    frames: VecDeque<Frame>,
    frame_buffer: RgbaImage,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            history: DEFAULT_FRAME_HISTORY,
            frames: VecDeque::new(),
            frame_buffer: RgbaImage::from_pixel(width, height, Rgba(CLEAR_COLOR)),
        }
    }

    /// Keep the last `history` submitted frames (at least one)
    pub fn with_history(mut self, history: usize) -> Self {
        self.history = history.max(1);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.back()
    }

    /// Submitted frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    /// Image of the last submitted frame
    pub fn frame_buffer(&self) -> &RgbaImage {
        &self.frame_buffer
    }

    /// Write the last frame to an image file, format chosen from the extension
    pub fn save_frame(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        self.frame_buffer.save(path)?;
        log::info!("Saved frame to {}", path.display());
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand, resources: &ResourceManager) {
        let Some(quad) = QuadRaster::new(command.instance().matrix()) else {
            return;
        };
        let (x_range, y_range) = quad.pixel_range(self.width, self.height);

        for py in y_range {
            for px in x_range.clone() {
                let ndc = Vec2::new(
                    (px as f32 + 0.5) / self.width as f32 * 2.0 - 1.0,
                    1.0 - (py as f32 + 0.5) / self.height as f32 * 2.0,
                );
                let Some((u, v)) = quad.texture_coordinates(ndc) else {
                    continue;
                };
                if let Some(color) = sample(command, resources, u, v) {
                    blend(self.frame_buffer.get_pixel_mut(px, py), color);
                }
            }
        }
    }
}

impl RenderBackend for HeadlessBackend {
    fn submit(&mut self, frame: Frame, resources: &ResourceManager) -> Result<(), RenderError> {
        self.frame_buffer = RgbaImage::from_pixel(self.width, self.height, Rgba(CLEAR_COLOR));
        for command in frame.commands() {
            self.draw(command, resources);
        }
        log::trace!("Rasterized frame {} ({} commands)", frame.index, frame.len());

        self.frames.push_back(frame);
        while self.frames.len() > self.history {
            self.frames.pop_front();
        }
        Ok(())
    }
}

/// Inverse of the 2D affine part of a quad matrix
struct QuadRaster {
    matrix: Mat4,
    inverse: [[f32; 2]; 2],
}

impl QuadRaster {
    fn new(matrix: Mat4) -> Option<Self> {
        let (a, b, c, d) = (matrix[0][0], matrix[1][0], matrix[0][1], matrix[1][1]);
        let det = a * d - b * c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        Some(Self {
            matrix,
            inverse: [[d / det, -b / det], [-c / det, a / det]],
        })
    }

    /// Pixels covered by the quad's bounding box
    fn pixel_range(&self, width: u32, height: u32) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let corners = crate::QUAD_POSITIONS.map(|[x, y]| tilekit_math::mat4::transform_point(self.matrix, Vec2::new(x, y)));
        let (mut min, mut max) = (corners[0], corners[0]);
        for corner in &corners[1..] {
            min = min.min_components(*corner);
            max = max.max_components(*corner);
        }

        let to_pixels = |low: f32, high: f32, size: u32| {
            let start = ((low + 1.0) / 2.0 * size as f32).floor().max(0.0) as u32;
            let end = ((high + 1.0) / 2.0 * size as f32).ceil().max(0.0) as u32;
            start.min(size)..end.min(size)
        };
        // pixel rows grow downwards
        (to_pixels(min.x, max.x, width), to_pixels(-max.y, -min.y, height))
    }

    /// Texture coordinates at a point in device coordinates, `None` outside the quad
    fn texture_coordinates(&self, ndc: Vec2) -> Option<(f32, f32)> {
        let dx = ndc.x - self.matrix[3][0];
        let dy = ndc.y - self.matrix[3][1];
        let x = self.inverse[0][0] * dx + self.inverse[0][1] * dy;
        let y = self.inverse[1][0] * dx + self.inverse[1][1] * dy;
        if x.abs() > 0.5 || y.abs() > 0.5 {
            return None;
        }
        Some((x + 0.5, 0.5 - y))
    }
}

fn sample(command: &DrawCommand, resources: &ResourceManager, u: f32, v: f32) -> Option<[u8; 4]> {
    match command {
        DrawCommand::Quad { texture, .. } => Some(resources.texture(*texture)?.sample(u, v)),
        DrawCommand::Level { level, tile_set, .. } => {
            let columns = (u * level.width() as f32).min(level.width() as f32 - 1.0).max(0.0);
            let rows = (v * level.height() as f32).min(level.height() as f32 - 1.0).max(0.0);
            let index = level.tile_index(columns as u32, rows as u32)?;
            let (origin_u, origin_v) = tile_set.tile_origin(index);
            let texture = resources.texture(tile_set.texture)?;
            Some(texture.sample(
                origin_u + columns.fract() / tile_set.width as f32,
                origin_v + rows.fract() / tile_set.height as f32,
            ))
        }
    }
}

fn blend(target: &mut Rgba<u8>, source: [u8; 4]) {
    let alpha = f32::from(source[3]) / 255.0;
    for channel in 0..3 {
        let blended = f32::from(source[channel]) * alpha + f32::from(target.0[channel]) * (1.0 - alpha);
        target.0[channel] = blended.round() as u8;
    }
    target.0[3] = 255;
}
