/// The seam between the scene graph and whatever puts pixels on screen
use crate::error::SceneError;
use crate::geometry::DrawMode;
use crate::matrix::Matrix;
use crate::projection::Light;

use super::NodeId;

/// Everything a backend needs to draw one node
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub node: NodeId,
    pub mode: DrawMode,
    pub positions: &'a [f64],
    pub normals: &'a [f64],
    pub colors: &'a [f64],
    pub specular_colors: &'a [f64],
    pub tex_coords: &'a [f64],
    pub shininess: f64,
    /// Cumulative `parent x T x R x S`
    pub model: &'a Matrix,
}

impl DrawCall<'_> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// The model matrix in the column-major layout GPU uniforms expect
    pub fn model_array(&self) -> Vec<f64> {
        self.model.to_column_major()
    }
}

/// Per-frame state shared by every draw call of the frame
#[derive(Debug, Clone)]
pub struct FrameState<'a> {
    pub view: Matrix,
    pub projection: Matrix,
    pub light: &'a Light,
}

/// A drawing backend.
///
/// The scene graph calls `begin_frame`, then `draw` once per non-empty node in
/// depth-first order, then `end_frame`.
pub trait Renderer {
    fn begin_frame(&mut self, _frame: &FrameState) -> Result<(), SceneError> {
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), SceneError>;

    fn end_frame(&mut self) -> Result<(), SceneError> {
        Ok(())
    }
}
