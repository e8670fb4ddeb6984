//! 2D mathematics for tilekit
//!
//! ## Core Types
//!
//! - [`Vec2`] - float vector used for rendering and pointer positions
//! - [`IVec2`] - integer vector used for world positions and speeds
//! - [`Rect`] - float rectangle used by the GUI
//! - [`Mat4`] / [`Projection`] - row-vector 4x4 matrices for sprite placement

mod ivec2;
mod rect;
mod vec2;
pub mod mat4;

pub use ivec2::IVec2;
pub use mat4::{Mat4, Projection};
pub use rect::Rect;
pub use vec2::Vec2;
