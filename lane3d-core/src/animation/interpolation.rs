/// Strategies for turning a keyframe segment into a transform
///
/// [`ComponentWise`] eases each of the ten scalar properties on its own,
/// rotation axis included. Large axis changes can pass through short or
/// meaningless intermediate axes that way; [`SlerpRotation`] swaps the
/// rotation part for a quaternion slerp when that matters more than
/// reproducing multi-turn spins.

use std::fmt;

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::transform::{Property, Rotation, Transform};

use super::easing::Easing;
use super::keyframe::Keyframe;

/// The keyframe pair bracketing the current frame, and where inside it we are
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub from: &'a Keyframe,
    pub to: &'a Keyframe,
    pub frame: u32,
}

impl<'a> Segment<'a> {
    pub fn new(from: &'a Keyframe, to: &'a Keyframe, frame: u32) -> Self {
        Self { from, to, frame }
    }

    pub fn easing(&self) -> Easing {
        self.from.easing()
    }

    pub fn local_frame(&self) -> f64 {
        f64::from(self.frame.saturating_sub(self.from.frame))
    }

    pub fn duration(&self) -> f64 {
        f64::from(self.to.frame.saturating_sub(self.from.frame))
    }

    /// Start and end of one property, absent values read from `live`
    pub fn endpoints(&self, property: Property, live: &Transform) -> (f64, f64) {
        let current = live.get(property);
        (
            self.from.get(property).unwrap_or(current),
            self.to.get(property).unwrap_or(current),
        )
    }

    /// Ease from `start` to `end` at this segment's local frame.
    /// A zero-length segment lands on its end value.
    pub fn ease(&self, start: f64, end: f64) -> f64 {
        let duration = self.duration();
        if duration == 0.0 {
            self.easing().ease(1.0, start, end - start, 1.0)
        } else {
            self.easing()
                .ease(self.local_frame(), start, end - start, duration)
        }
    }

    /// Eased value of a single property
    pub fn value(&self, property: Property, live: &Transform) -> f64 {
        let (start, end) = self.endpoints(property, live);
        self.ease(start, end)
    }
}

/// Computes a node's transform for one frame of a segment
pub trait Interpolator: fmt::Debug {
    fn interpolate(&self, segment: &Segment, live: &Transform) -> Transform;
}

/// Every property eased independently
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentWise;

impl Interpolator for ComponentWise {
    fn interpolate(&self, segment: &Segment, live: &Transform) -> Transform {
        let mut transform = *live;
        for property in Property::ALL {
            transform.set(property, segment.value(property, live));
        }
        transform
    }
}

const ROTATION: [Property; 4] = [
    Property::RotateX,
    Property::RotateY,
    Property::RotateZ,
    Property::RotateAngle,
];

/// Translate and scale eased per component, rotation slerped along the
/// shortest arc between the two keyframe orientations.
///
/// Spins of more than half a turn between two keyframes collapse to the
/// shortest arc. Segments whose axes have no direction, or whose
/// orientations are opposite, fall back to [`ComponentWise`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SlerpRotation;

impl SlerpRotation {
    fn orientation(axis: [f64; 3], angle: f64) -> Option<UnitQuaternion<f64>> {
        let axis = Unit::try_new(Vector3::from(axis), f64::EPSILON)?;
        Some(UnitQuaternion::from_axis_angle(&axis, angle.to_radians()))
    }

    fn endpoint_orientations(
        segment: &Segment,
        live: &Transform,
    ) -> Option<(UnitQuaternion<f64>, UnitQuaternion<f64>)> {
        let [x, y, z, angle] = ROTATION.map(|p| segment.endpoints(p, live));
        let start = Self::orientation([x.0, y.0, z.0], angle.0)?;
        let end = Self::orientation([x.1, y.1, z.1], angle.1)?;
        Some((start, end))
    }
}

impl Interpolator for SlerpRotation {
    fn interpolate(&self, segment: &Segment, live: &Transform) -> Transform {
        let mut transform = ComponentWise.interpolate(segment, live);

        let Some((start, end)) = Self::endpoint_orientations(segment, live) else {
            return transform;
        };
        let progress = segment.ease(0.0, 1.0);
        let Some(orientation) = start.try_slerp(&end, progress, 1.0e-9) else {
            return transform;
        };

        transform.rotate = match orientation.axis_angle() {
            Some((axis, angle)) => Rotation::new(angle.to_degrees(), axis.x, axis.y, axis.z),
            // identity orientation: keep a usable axis
            None => Rotation {
                angle: 0.0,
                ..transform.rotate
            },
        };
        transform
    }
}
