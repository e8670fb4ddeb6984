//! 2D orthographic camera
//!
//! The projection mirrors the x axis and every world-space placement
//! mirrors it back (see `ResourceManager::sprite_command`), so the camera
//! translation is accumulated with x and y in opposite senses.

use tilekit_math::{Projection, Vec2};

/// The field of view the world is rendered through
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    size: Vec2,
    position: Vec2,
    viewport: Vec2,
    position_matrix: Projection,
    projection_matrix: Projection,
}

impl Camera {
    /// Camera centred on the origin, seeing `size` world units
    pub fn new(size: Vec2) -> Self {
        let viewport = size / 2.0;
        Self {
            size,
            position: Vec2::ZERO,
            viewport,
            position_matrix: Projection::new(),
            projection_matrix: Self::orthographic(viewport),
        }
    }

    fn orthographic(viewport: Vec2) -> Projection {
        Projection::new().orthographic(-viewport.x, viewport.x, -viewport.y, viewport.y)
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Half the size
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// World position of the centre of the view
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn position_matrix(&self) -> &Projection {
        &self.position_matrix
    }

    pub fn projection_matrix(&self) -> &Projection {
        &self.projection_matrix
    }

    pub fn set_position(&mut self, position: Vec2) {
        let delta = Vec2::new(position.x - self.position.x, self.position.y - position.y);
        self.position_matrix = self.position_matrix.translate(delta);
        self.position = position;
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.viewport = size / 2.0;
        self.projection_matrix = Self::orthographic(self.viewport);
    }

    /// Screen position in `[-1, 1]` to world coordinates
    pub fn transform_world(&self, screen: Vec2) -> Vec2 {
        let local = self.projection_matrix.inverse_transform(screen);
        Vec2::new(self.position.x - local.x, self.position.y + local.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn test_viewport_is_half_size() {
        let camera = Camera::new(Vec2::new(200.0, 100.0));
        assert_eq!(camera.viewport(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_transform_world_at_origin() {
        let camera = Camera::new(Vec2::new(200.0, 100.0));
        assert!(approx(camera.transform_world(Vec2::ZERO), Vec2::ZERO));
        assert!(approx(camera.transform_world(Vec2::new(1.0, 1.0)), Vec2::new(100.0, 50.0)));
        assert!(approx(camera.transform_world(Vec2::new(-1.0, -0.5)), Vec2::new(-100.0, -25.0)));
    }

    #[test]
    fn test_transform_world_follows_position() {
        let mut camera = Camera::new(Vec2::new(200.0, 100.0));
        camera.set_position(Vec2::new(30.0, -10.0));
        assert!(approx(camera.transform_world(Vec2::ZERO), Vec2::new(30.0, -10.0)));
        assert!(approx(camera.transform_world(Vec2::new(1.0, 0.0)), Vec2::new(130.0, -10.0)));
    }

    #[test]
    fn test_position_matrix_accumulates() {
        let mut camera = Camera::new(Vec2::new(10.0, 10.0));
        camera.set_position(Vec2::new(4.0, 2.0));
        camera.set_position(Vec2::new(6.0, 5.0));
        let matrix = camera.position_matrix().matrix;
        assert_eq!(matrix[3][0], 6.0);
        assert_eq!(matrix[3][1], -5.0);
    }

    #[test]
    fn test_set_size() {
        let mut camera = Camera::new(Vec2::new(10.0, 10.0));
        camera.set_size(Vec2::new(40.0, 20.0));
        assert_eq!(camera.viewport(), Vec2::new(20.0, 10.0));
        assert!(approx(camera.transform_world(Vec2::new(1.0, 1.0)), Vec2::new(20.0, 10.0)));
    }
}
