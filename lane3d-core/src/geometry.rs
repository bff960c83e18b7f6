/// Indexed geometry and the flattening rules that turn it into draw streams
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// How a node's faces are handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Every face's vertices in order; faces are expected to be triangles
    #[default]
    Triangles,
    /// Every face edge as a separate segment, closing back to the first vertex
    Lines,
}

/// How per-vertex normals are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMode {
    /// One normal per face, shared by all of its emitted vertices
    #[default]
    Flat,
    /// Each vertex position taken as a direction from the origin.
    /// Only meaningful for convex shapes centered on the origin.
    Vertex,
}

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }
}

/// Vertex positions plus faces indexing into them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<[f64; 3]>,
    /// Each face lists at least three vertex indices
    pub indices: Vec<Vec<usize>>,
    /// Optional texture coordinates, one per vertex when present
    pub tex_coords: Vec<[f64; 2]>,
}

impl Geometry {
    pub fn new(vertices: Vec<[f64; 3]>, indices: Vec<Vec<usize>>) -> Self {
        Self {
            vertices,
            indices,
            tex_coords: Vec::new(),
        }
    }

    /// Geometry of a pure group node
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_tex_coords(mut self, tex_coords: Vec<[f64; 2]>) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// Nothing to draw when either vertices or faces are missing
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Check face sizes, index ranges and texture coordinate count
    pub fn validate(&self) -> Result<(), SceneError> {
        let vertex_count = self.vertices.len();

        for (face, indices) in self.indices.iter().enumerate() {
            if indices.len() < 3 {
                return Err(SceneError::DegenerateFace {
                    face,
                    len: indices.len(),
                });
            }
            if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(SceneError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }

        if !self.tex_coords.is_empty() && self.tex_coords.len() != vertex_count {
            return Err(SceneError::GeometryMismatch {
                attribute: "texture coordinates",
                expected: vertex_count,
                found: self.tex_coords.len(),
            });
        }

        Ok(())
    }

    /// Number of vertices emitted into the flattened streams for `mode`
    pub fn emitted_vertex_count(&self, mode: DrawMode) -> usize {
        if self.is_empty() {
            return 0;
        }
        let corners: usize = self.indices.iter().map(Vec::len).sum();
        match mode {
            DrawMode::Triangles => corners,
            DrawMode::Lines => corners * 2,
        }
    }

    /// Calculate the normal of a face from its first three vertices.
    /// The geometry must have passed [`validate`](Self::validate).
    ///
    /// Collapsed faces (as found at the poles of revolved shapes) yield a
    /// zero vector rather than NaN.
    pub(crate) fn face_normal(&self, face: usize) -> Vector3<f64> {
        let indices = &self.indices[face];
        let p0 = Vector3::from(self.vertices[indices[0]]);
        let p1 = Vector3::from(self.vertices[indices[1]]);
        let p2 = Vector3::from(self.vertices[indices[2]]);

        let edge1 = p1 - p0;
        let edge2 = p2 - p0;

        edge1
            .cross(&edge2)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Visit `(face, vertex index)` pairs in emission order for `mode`
    fn for_each_emitted(&self, mode: DrawMode, mut visit: impl FnMut(usize, usize)) {
        if self.is_empty() {
            return;
        }
        for (face, indices) in self.indices.iter().enumerate() {
            let n = indices.len();
            for j in 0..n {
                visit(face, indices[j]);
                if mode == DrawMode::Lines {
                    visit(face, indices[(j + 1) % n]);
                }
            }
        }
    }
}

/// Flatten indexed vertices into a raw `x, y, z` stream
pub(crate) fn derive_draw_array(geometry: &Geometry, mode: DrawMode) -> Vec<f64> {
    let mut result = Vec::with_capacity(geometry.emitted_vertex_count(mode) * 3);
    geometry.for_each_emitted(mode, |_, index| {
        result.extend_from_slice(&geometry.vertices[index]);
    });
    result
}

/// One normal per emitted vertex, following `normal_mode`
pub(crate) fn derive_normals(geometry: &Geometry, mode: DrawMode, normal_mode: NormalMode) -> Vec<f64> {
    let mut result = Vec::with_capacity(geometry.emitted_vertex_count(mode) * 3);
    match normal_mode {
        NormalMode::Flat => {
            let face_normals: Vec<Vector3<f64>> = (0..geometry.indices.len())
                .map(|face| geometry.face_normal(face))
                .collect();
            geometry.for_each_emitted(mode, |face, _| {
                result.extend_from_slice(face_normals[face].as_slice());
            });
        }
        NormalMode::Vertex => {
            geometry.for_each_emitted(mode, |_, index| {
                let normal = Vector3::from(geometry.vertices[index])
                    .try_normalize(f64::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                result.extend_from_slice(normal.as_slice());
            });
        }
    }
    result
}

/// Flattened `u, v` stream; empty when the geometry carries no coordinates
pub(crate) fn derive_tex_coords(geometry: &Geometry, mode: DrawMode) -> Vec<f64> {
    if geometry.tex_coords.is_empty() {
        return Vec::new();
    }
    let mut result = Vec::with_capacity(geometry.emitted_vertex_count(mode) * 2);
    geometry.for_each_emitted(mode, |_, index| {
        result.extend_from_slice(&geometry.tex_coords[index]);
    });
    result
}

/// Per-vertex color stream: the explicit colors when given, otherwise `base`
/// repeated once per emitted vertex.
pub(crate) fn derive_color_array(
    attribute: &'static str,
    base: Color,
    explicit: Option<&[Color]>,
    vertex_count: usize,
) -> Result<Vec<f64>, SceneError> {
    match explicit {
        Some(colors) if colors.len() != vertex_count => Err(SceneError::GeometryMismatch {
            attribute,
            expected: vertex_count,
            found: colors.len(),
        }),
        Some(colors) => Ok(colors.iter().flat_map(|c| c.to_array()).collect()),
        None => Ok((0..vertex_count).flat_map(|_| base.to_array()).collect()),
    }
}
