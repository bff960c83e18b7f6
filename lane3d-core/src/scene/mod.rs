/// Hierarchical scene of drawable nodes

mod graph;
mod render;
mod shape;

pub use graph::{NodeId, SceneGraph};
pub use render::{DrawCall, FrameState, Renderer};
pub use shape::{DrawArrays, Shape, ShapeBuilder, DEFAULT_SHININESS};
