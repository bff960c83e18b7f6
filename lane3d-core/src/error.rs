/// Error types for matrix math, scene construction and animation

use thiserror::Error;

use crate::scene::NodeId;

/// Errors raised by [`Matrix`](crate::matrix::Matrix) operations and constructors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// Operand shapes are incompatible for the requested operation
    #[error(
        "cannot {op} a {}x{} matrix with a {}x{} matrix",
        .left.0, .left.1, .right.0, .right.1
    )]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// An element grid whose rows differ in length
    #[error("row {row} has {found} elements, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Rotation requested about an axis that cannot be normalized
    #[error("rotation axis ({x}, {y}, {z}) has no direction")]
    DegenerateAxis { x: f64, y: f64, z: f64 },
}

/// Errors raised while building or traversing the scene graph
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// A per-vertex attribute array does not line up with the geometry
    #[error("{attribute} has {found} entries, expected {expected}")]
    GeometryMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    /// A face references a vertex that does not exist
    #[error("face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// A face with fewer than three vertices
    #[error("face {face} has {len} vertices, at least 3 are required")]
    DegenerateFace { face: usize, len: usize },

    /// A node id that is not (or no longer) part of the graph
    #[error("node {0:?} is not part of the scene graph")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

/// Errors raised by the keyframe tweener
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TweenError {
    /// Keyframe frame numbers must never decrease within a sprite
    #[error("keyframe {index} is at frame {frame}, before the previous keyframe at frame {previous}")]
    UnsortedKeyframes {
        index: usize,
        previous: u32,
        frame: u32,
    },

    #[error("frame rate must be at least 1 frame per second")]
    InvalidFrameRate,

    /// A sprite targets a node missing from the graph being animated
    #[error("sprite target {0:?} is not part of the scene graph")]
    MissingTarget(NodeId),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
