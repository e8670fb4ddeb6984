//! Shader-free rendering for tilekit
//!
//! Rendering produces a [`Frame`]: an ordered list of textured unit quads,
//! each placed by a position matrix and a projection matrix. A
//! [`RenderBackend`] turns frames into pixels; the [`HeadlessBackend`] does
//! it on the CPU.
//!
//! ```text
//! ResourceManager ──┐
//! World + Camera ───┼─> WorldRenderer ─┐
//! GuiManager ───────┘                  ├─> Frame ─> RenderBackend
//!                                      ┘
//! ```

mod backend;
mod camera;
mod draw;
mod error;
pub mod gui;
mod renderer;
mod resources;
mod sprite;
mod texture;

pub use backend::{HeadlessBackend, RenderBackend, DEFAULT_FRAME_HISTORY};
pub use camera::Camera;
pub use draw::{DrawCommand, DrawLayer, Frame, QuadInstance, QUAD_INDICES, QUAD_POSITIONS, QUAD_TEXTURE_COORDINATES};
pub use error::RenderError;
pub use gui::{ComponentKey, GuiManager};
pub use renderer::{is_in_view, LevelRenderer, WorldRenderer};
pub use resources::{BackgroundLayer, ResourceManager};
pub use sprite::{Animation, SpriteSet, TileSet, MAX_TILE_SET_SIZE};
pub use texture::{LevelTexture, Texture, TextureId};
