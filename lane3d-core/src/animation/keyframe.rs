/// Keyframes and the sprites that bind a keyframe track to a scene node
use crate::error::TweenError;
use crate::scene::NodeId;
use crate::transform::Property;

use super::easing::Easing;

/// A pose at one frame. Every property is optional; an absent one resolves
/// to the target node's live value when the frame is evaluated.
#[derive(Debug, Clone, Copy, Default)]
pub struct Keyframe {
    pub frame: u32,
    values: [Option<f64>; Property::COUNT],
    easing: Option<Easing>,
}

impl Keyframe {
    pub fn at(frame: u32) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn set(mut self, property: Property, value: f64) -> Self {
        self.values[property.index()] = Some(value);
        self
    }

    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        self.set(Property::TranslateX, x)
            .set(Property::TranslateY, y)
            .set(Property::TranslateZ, z)
    }

    pub fn scale(self, x: f64, y: f64, z: f64) -> Self {
        self.set(Property::ScaleX, x)
            .set(Property::ScaleY, y)
            .set(Property::ScaleZ, z)
    }

    /// Rotation axis; need not be normalized
    pub fn axis(self, x: f64, y: f64, z: f64) -> Self {
        self.set(Property::RotateX, x)
            .set(Property::RotateY, y)
            .set(Property::RotateZ, z)
    }

    /// Rotation angle in degrees
    pub fn angle(self, degrees: f64) -> Self {
        self.set(Property::RotateAngle, degrees)
    }

    /// Easing used for the segment that starts at this keyframe
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn get(&self, property: Property) -> Option<f64> {
        self.values[property.index()]
    }

    pub fn easing(&self) -> Easing {
        self.easing.unwrap_or_default()
    }
}

/// A scene node together with the keyframe track that animates it
#[derive(Debug, Clone)]
pub struct Sprite {
    target: NodeId,
    keyframes: Vec<Keyframe>,
}

impl Sprite {
    /// Fails when the track's frame numbers ever decrease
    pub fn new(target: NodeId, keyframes: Vec<Keyframe>) -> Result<Self, TweenError> {
        if let Some(index) = keyframes.windows(2).position(|w| w[1].frame < w[0].frame) {
            return Err(TweenError::UnsortedKeyframes {
                index: index + 1,
                previous: keyframes[index].frame,
                frame: keyframes[index + 1].frame,
            });
        }
        Ok(Self { target, keyframes })
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// First adjacent pair of keyframes whose frames bracket `frame`
    pub fn interval(&self, frame: u32) -> Option<(&Keyframe, &Keyframe)> {
        self.keyframes
            .windows(2)
            .find(|w| w[0].frame <= frame && frame <= w[1].frame)
            .map(|w| (&w[0], &w[1]))
    }

    /// Frame of the last keyframe, if any
    pub fn last_frame(&self) -> Option<u32> {
        self.keyframes.last().map(|k| k.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Vec<Keyframe> {
        vec![
            Keyframe::at(0).translate(0.0, 0.0, 0.0),
            Keyframe::at(10).translate(10.0, 0.0, 0.0).ease(Easing::QuadIn),
            Keyframe::at(20).angle(90.0),
        ]
    }

    #[test]
    fn test_builder_sets_only_named_properties() {
        let keyframe = Keyframe::at(4).axis(1.0, 1.0, 0.0).angle(720.0);
        assert_eq!(keyframe.get(Property::RotateX), Some(1.0));
        assert_eq!(keyframe.get(Property::RotateAngle), Some(720.0));
        assert_eq!(keyframe.get(Property::TranslateX), None);
        assert!(matches!(keyframe.easing(), Easing::Linear));
    }

    #[test]
    fn test_interval_lookup() {
        let sprite = Sprite::new(NodeId::default(), track()).unwrap();

        let (from, to) = sprite.interval(5).unwrap();
        assert_eq!((from.frame, to.frame), (0, 10));

        // a shared boundary belongs to the first pair
        let (from, to) = sprite.interval(10).unwrap();
        assert_eq!((from.frame, to.frame), (0, 10));

        let (from, _) = sprite.interval(11).unwrap();
        assert!(matches!(from.easing(), Easing::QuadIn));

        assert!(sprite.interval(21).is_none());
        assert_eq!(sprite.last_frame(), Some(20));
    }

    #[test]
    fn test_unsorted_keyframes_rejected() {
        let result = Sprite::new(
            NodeId::default(),
            vec![Keyframe::at(0), Keyframe::at(8), Keyframe::at(4)],
        );
        assert_eq!(
            result.unwrap_err(),
            TweenError::UnsortedKeyframes {
                index: 2,
                previous: 8,
                frame: 4
            }
        );
    }

    #[test]
    fn test_repeated_frames_allowed() {
        let sprite = Sprite::new(NodeId::default(), vec![Keyframe::at(3), Keyframe::at(3)]).unwrap();
        assert!(sprite.interval(3).is_some());
        assert!(sprite.interval(2).is_none());
    }

    #[test]
    fn test_single_keyframe_never_brackets() {
        let sprite = Sprite::new(NodeId::default(), vec![Keyframe::at(0)]).unwrap();
        assert!(sprite.interval(0).is_none());
    }
}
