//! Draw lists
//!
//! Everything is drawn as a unit quad centred on the origin, placed by a
//! position matrix and then a projection matrix (row-vector convention:
//! `vertex · position · projection`).

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use tilekit_math::{mat4, Mat4, Projection, Vec2};

use crate::{LevelTexture, TextureId, TileSet};

/// Corners of the unit quad
pub const QUAD_POSITIONS: [[f32; 2]; 4] = [[-0.5, 0.5], [0.5, 0.5], [0.5, -0.5], [-0.5, -0.5]];

/// Texture coordinates of the quad corners, `(0, 0)` at the top-left
pub const QUAD_TEXTURE_COORDINATES: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two triangles covering the quad
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Per-quad matrices, laid out for direct upload to a GPU buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub position: Mat4,
    pub projection: Mat4,
}

impl QuadInstance {
    pub fn new(position: Projection, projection: Projection) -> Self {
        Self {
            position: position.matrix,
            projection: projection.matrix,
        }
    }

    /// `position · projection`
    pub fn matrix(&self) -> Mat4 {
        mat4::mul(self.position, self.projection)
    }

    /// Quad corners in normalized device coordinates
    pub fn corners(&self) -> [Vec2; 4] {
        let matrix = self.matrix();
        QUAD_POSITIONS.map(|[x, y]| mat4::transform_point(matrix, Vec2::new(x, y)))
    }
}

/// Painter's order of the things in a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DrawLayer {
    Background,
    Level,
    Sprite,
    Gui,
}

/// One textured quad to draw
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A quad showing a whole texture
    Quad {
        layer: DrawLayer,
        texture: TextureId,
        instance: QuadInstance,
    },
    /// The tile level, looked up tile by tile in the tile set
    Level {
        level: Arc<LevelTexture>,
        tile_set: TileSet,
        instance: QuadInstance,
    },
}

impl DrawCommand {
    pub fn quad(layer: DrawLayer, texture: TextureId, position: Projection, projection: Projection) -> Self {
        DrawCommand::Quad {
            layer,
            texture,
            instance: QuadInstance::new(position, projection),
        }
    }

    pub fn layer(&self) -> DrawLayer {
        match self {
            DrawCommand::Quad { layer, .. } => *layer,
            DrawCommand::Level { .. } => DrawLayer::Level,
        }
    }

    pub fn instance(&self) -> &QuadInstance {
        match self {
            DrawCommand::Quad { instance, .. } | DrawCommand::Level { instance, .. } => instance,
        }
    }

    pub fn texture(&self) -> Option<TextureId> {
        match self {
            DrawCommand::Quad { texture, .. } => Some(*texture),
            DrawCommand::Level { .. } => None,
        }
    }
}

/// Everything drawn during one render frame, in order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub index: u64,
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(index: u64) -> Self {
        Self {
            index,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands drawn in `layer`
    pub fn layer(&self, layer: DrawLayer) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().filter(move |c| c.layer() == layer)
    }

    /// Instance data of every command as raw bytes
    pub fn instance_bytes(&self) -> Vec<u8> {
        let instances: Vec<QuadInstance> = self.commands.iter().map(|c| *c.instance()).collect();
        bytemuck::cast_slice(&instances).to_vec()
    }
}

impl Extend<DrawCommand> for Frame {
    fn extend<I: IntoIterator<Item = DrawCommand>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_follow_position() {
        let instance = QuadInstance::new(
            Projection::new().scale(Vec2::new(2.0, 4.0)).translate(Vec2::new(1.0, 0.0)),
            Projection::new(),
        );
        let corners = instance.corners();
        assert_eq!(corners[0], Vec2::new(0.0, 2.0));
        assert_eq!(corners[2], Vec2::new(2.0, -2.0));
    }

    #[test]
    fn test_instance_bytes() {
        let mut frame = Frame::new(0);
        frame.push(DrawCommand::quad(DrawLayer::Sprite, TextureId(0), Projection::new(), Projection::new()));
        frame.push(DrawCommand::quad(DrawLayer::Gui, TextureId(1), Projection::new(), Projection::new()));

        assert_eq!(frame.instance_bytes().len(), 2 * std::mem::size_of::<QuadInstance>());
        assert_eq!(std::mem::size_of::<QuadInstance>(), 128);
        assert_eq!(frame.layer(DrawLayer::Gui).count(), 1);
    }
}
