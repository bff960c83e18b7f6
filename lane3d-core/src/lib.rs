/// Lane3D Core Library - matrices, scene graph and keyframe animation
///
/// This library holds the renderer-independent half of the engine: a general
/// matrix type with the usual 3D transform constructors, a hierarchical scene
/// graph that flattens procedural geometry into draw streams, and a keyframe
/// tweener that animates node transforms frame by frame.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod projection;
pub mod scene;
pub mod shapes;
pub mod transform;

// Re-export commonly used types
pub use animation::{Easing, Keyframe, KeyframeTweener, Sprite, TickOutcome, TweenSettings, TweenState};
pub use config::{Config, ConfigError, SceneConfig};
pub use error::{MatrixError, SceneError, TweenError};
pub use geometry::{Color, DrawMode, Geometry, NormalMode};
pub use matrix::{Frustum, Matrix, TransformDescriptor};
pub use projection::{Camera, Light, ProjectionMode};
pub use scene::{DrawCall, FrameState, NodeId, Renderer, SceneGraph, Shape, ShapeBuilder};
pub use transform::{Property, Rotation, Scale, Transform, Translation};
