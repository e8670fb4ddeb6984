//! 4x4 matrix utilities for 2D sprite placement
//!
//! Matrices use the row-vector convention: a point is the row `[x, y, 0, 1]`
//! multiplied on the left, so translations live in row 3. Every builder step
//! post-multiplies, which means the first operation in a chain is applied
//! first to the point.

use crate::Vec2;

/// 4x4 matrix type (row-major, row-vector convention)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Standard matrix product `a · b`
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }

    result
}

/// Transform a 2D point (as row vector `[x, y, 0, 1]`)
pub fn transform_point(m: Mat4, p: Vec2) -> Vec2 {
    let v = [p.x, p.y, 0.0, 1.0];
    let mut out = [0.0f32; 2];
    for (j, o) in out.iter_mut().enumerate() {
        *o = (0..4).map(|k| v[k] * m[k][j]).sum();
    }
    Vec2::new(out[0], out[1])
}

/// Chainable 2D projection builder
///
/// ```
/// use tilekit_math::{Projection, Vec2};
/// let p = Projection::new().scale(Vec2::new(2.0, 2.0)).translate(Vec2::new(1.0, 0.0));
/// assert_eq!(p.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(3.0, 2.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub matrix: Mat4,
}

impl Default for Projection {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection {
    /// Identity projection
    pub const fn new() -> Self {
        Self { matrix: IDENTITY }
    }

    /// Wrap an existing matrix
    pub const fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Append an orthographic projection
    ///
    /// The argument order is `right, left, bottom, top`; passing `left > right`
    /// mirrors the x axis, which the camera relies on.
    pub fn orthographic(self, right: f32, left: f32, bottom: f32, top: f32) -> Self {
        let ortho = [
            [2.0 / (right - left), 0.0, 0.0, -(right + left) / (right - left)],
            [0.0, 2.0 / (top - bottom), 0.0, -(top + bottom) / (top - bottom)],
            [0.0, 0.0, -1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self.dot(&ortho)
    }

    /// Append a scale
    pub fn scale(self, scale: Vec2) -> Self {
        let m = [
            [scale.x, 0.0, 0.0, 0.0],
            [0.0, scale.y, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self.dot(&m)
    }

    /// Append a translation
    pub fn translate(self, translation: Vec2) -> Self {
        let m = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [translation.x, translation.y, 0.0, 1.0],
        ];
        self.dot(&m)
    }

    /// Append a rotation by `angle` radians
    pub fn rotate(self, angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let m = [
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self.dot(&m)
    }

    /// Append an arbitrary matrix
    pub fn dot(self, matrix: &Mat4) -> Self {
        Self {
            matrix: mul(self.matrix, *matrix),
        }
    }

    /// Undo the scale part of the projection for a 2D vector
    ///
    /// Translation is ignored; callers that need it subtract it themselves.
    pub fn inverse_transform(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x / self.matrix[0][0], v.y / self.matrix[1][1])
    }

    /// Apply the projection to a 2D point
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        transform_point(self.matrix, p)
    }
}
