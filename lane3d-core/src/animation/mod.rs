/// Keyframe animation of scene graph transforms

mod easing;
mod interpolation;
mod keyframe;
mod tweener;

pub use easing::{linear, quad_ease_in, quad_ease_in_out, quad_ease_out, EaseFn, Easing};
pub use interpolation::{ComponentWise, Interpolator, Segment, SlerpRotation};
pub use keyframe::{Keyframe, Sprite};
pub use tweener::{
    KeyframeTweener, TickOutcome, TweenSettings, TweenState, DEFAULT_FINAL_FRAME,
    DEFAULT_FRAME_RATE,
};
