/// Camera, lighting and projection utilities
use serde::{Deserialize, Serialize};

use crate::error::MatrixError;
use crate::geometry::Color;
use crate::matrix::{Frustum, Matrix};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

/// Free-flying camera described by a position and pitch / yaw / roll angles
/// in degrees. There is no look-at target; the camera looks down its own -z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: [f64; 3],
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub frustum: Frustum,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Distance covered by one [`advance`](Camera::advance) or
    /// [`strafe`](Camera::strafe) step
    pub const STEP: f64 = 0.25;
    /// Degrees turned per [`turn`](Camera::turn) step
    pub const TURN: f64 = 0.3;
    /// Height change per [`climb`](Camera::climb) step
    pub const CLIMB: f64 = 0.1;

    pub fn new(width: u32, height: u32) -> Self {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f64 / height as f64
        };
        Self {
            position: [0.0, 3.0, 1.0],
            pitch: -2.0,
            yaw: 0.0,
            roll: 0.0,
            frustum: Frustum::new(-2.0 * aspect, 2.0 * aspect, -2.0, 2.0, 6.0, 200.0),
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix: undo the camera's translation, then its yaw,
    /// pitch and roll in that order
    pub fn view_matrix(&self) -> Result<Matrix, MatrixError> {
        let [x, y, z] = self.position;
        let translate = Matrix::translate(-x, -y, -z);
        let yaw = Matrix::rotate(-self.yaw, 0.0, 1.0, 0.0)?;
        let pitch = Matrix::rotate(-self.pitch, 1.0, 0.0, 0.0)?;
        let roll = Matrix::rotate(-self.roll, 0.0, 0.0, 1.0)?;

        roll.multiply(&pitch.multiply(&yaw.multiply(&translate)?)?)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix {
        match self.mode {
            ProjectionMode::Perspective => Matrix::perspective(&self.frustum),
            ProjectionMode::Orthographic => Matrix::orthographic(&self.frustum),
        }
    }

    /// Keep the frustum's vertical extent and refit its width to a new viewport
    pub fn set_aspect(&mut self, aspect: f64) {
        if !aspect.is_finite() || aspect <= 0.0 {
            return;
        }
        let half_height = (self.frustum.top - self.frustum.bottom) / 2.0;
        self.frustum.left = -half_height * aspect;
        self.frustum.right = half_height * aspect;
    }

    /// Move along the viewing direction; negative steps back up.
    /// Pitch tilts the motion up or down.
    pub fn advance(&mut self, steps: f64) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let sin_pitch = self.pitch.to_radians().sin();
        let distance = steps * Self::STEP;

        self.position[0] -= sin_yaw * distance;
        self.position[1] += sin_pitch * distance;
        self.position[2] -= cos_yaw * distance;
    }

    /// Move sideways; positive steps go right
    pub fn strafe(&mut self, steps: f64) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let distance = steps * Self::STEP;

        self.position[0] += cos_yaw * distance;
        self.position[2] -= sin_yaw * distance;
    }

    pub fn climb(&mut self, steps: f64) {
        self.position[1] += steps * Self::CLIMB;
    }

    /// Turn left for positive steps, right for negative ones
    pub fn turn(&mut self, steps: f64) {
        self.yaw += steps * Self::TURN;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// A single positional light plus a global ambient term
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Light {
    /// Homogeneous position; `w == 0.0` makes it directional
    pub position: [f64; 4],
    pub diffuse: Color,
    pub specular: Color,
    pub ambient: Color,
}

impl Light {
    /// Position in world space, or the direction towards the light when
    /// `w` is zero
    pub fn position3(&self) -> [f64; 3] {
        let [x, y, z, w] = self.position;
        if w == 0.0 {
            [x, y, z]
        } else {
            [x / w, y / w, z / w]
        }
    }

    pub fn is_directional(&self) -> bool {
        self.position[3] == 0.0
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: [500.0, 500.0, 100.0, 1.0],
            diffuse: Color::WHITE,
            specular: Color::WHITE,
            ambient: Color::new(0.2, 0.2, 0.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn apply(m: &Matrix, p: [f64; 3]) -> [f64; 4] {
        let v = Matrix::from_rows(vec![vec![p[0]], vec![p[1]], vec![p[2]], vec![1.0]]).unwrap();
        let r = m.multiply(&v).unwrap();
        [r.get(0, 0), r.get(1, 0), r.get(2, 0), r.get(3, 0)]
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert_eq!(camera.position, [0.0, 3.0, 1.0]);
        assert_relative_eq!(camera.frustum.right, 2.0 * 800.0 / 600.0);
        assert_relative_eq!(camera.frustum.near, 6.0);
    }

    #[test]
    fn test_view_matrix_moves_camera_to_origin() {
        let mut camera = Camera::default();
        camera.pitch = 0.0;
        let view = camera.view_matrix().unwrap();
        let p = apply(&view, camera.position);
        assert_relative_eq!(p[0], 0.0);
        assert_relative_eq!(p[1], 0.0);
        assert_relative_eq!(p[2], 0.0);

        // a point straight ahead stays straight ahead
        let ahead = apply(&view, [0.0, 3.0, -9.0]);
        assert_relative_eq!(ahead[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(ahead[2], -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_turns_view() {
        let mut camera = Camera::default();
        camera.pitch = 0.0;
        camera.position = [0.0, 0.0, 0.0];
        camera.yaw = 90.0;
        // looking left, a point to the left is now straight ahead
        let p = apply(&camera.view_matrix().unwrap(), [-5.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_projection_depth() {
        let camera = Camera::default();
        let projection = camera.projection_matrix();
        let near = apply(&projection, [0.0, 0.0, -6.0]);
        assert_relative_eq!(near[2] / near[3], -1.0, epsilon = 1e-12);
        let far = apply(&projection, [0.0, 0.0, -200.0]);
        assert_relative_eq!(far[2] / far[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_movement() {
        let mut camera = Camera::default();
        camera.pitch = 0.0;
        camera.advance(4.0);
        assert_relative_eq!(camera.position[2], 0.0, epsilon = 1e-12);
        camera.strafe(-4.0);
        assert_relative_eq!(camera.position[0], -1.0, epsilon = 1e-12);
        camera.climb(10.0);
        assert_relative_eq!(camera.position[1], 4.0, epsilon = 1e-12);
        camera.turn(-10.0);
        assert_relative_eq!(camera.yaw, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_set_aspect_keeps_height() {
        let mut camera = Camera::new(100, 100);
        camera.set_aspect(2.0);
        assert_relative_eq!(camera.frustum.left, -4.0);
        assert_relative_eq!(camera.frustum.top, 2.0);
        camera.set_aspect(0.0);
        assert_relative_eq!(camera.frustum.right, 4.0);
    }

    #[test]
    fn test_default_light() {
        let light = Light::default();
        assert_eq!(light.position3(), [500.0, 500.0, 100.0]);
        assert!(!light.is_directional());
        assert_eq!(light.ambient, Color::new(0.2, 0.2, 0.2));
    }
}
