/// Easing curves with the `(local_frame, start, distance, duration)` signature
use std::fmt;

/// Signature shared by every easing curve: frames elapsed since the segment's
/// first keyframe, the start value, the total change and the segment length.
pub type EaseFn = fn(f64, f64, f64, f64) -> f64;

pub fn linear(current_time: f64, start: f64, distance: f64, duration: f64) -> f64 {
    let percent_complete = current_time / duration;
    distance * percent_complete + start
}

pub fn quad_ease_in(current_time: f64, start: f64, distance: f64, duration: f64) -> f64 {
    let percent_complete = current_time / duration;
    distance * percent_complete * percent_complete + start
}

pub fn quad_ease_out(current_time: f64, start: f64, distance: f64, duration: f64) -> f64 {
    let percent_complete = current_time / duration;
    -distance * percent_complete * (percent_complete - 2.0) + start
}

/// Accelerate through the first half of the segment, decelerate through the
/// second
pub fn quad_ease_in_out(current_time: f64, start: f64, distance: f64, duration: f64) -> f64 {
    let percent_complete = current_time / (duration / 2.0);
    if percent_complete < 1.0 {
        (distance / 2.0) * percent_complete * percent_complete + start
    } else {
        let p = percent_complete - 1.0;
        -(distance / 2.0) * (p * (p - 2.0) - 1.0) + start
    }
}

/// Easing attached to a keyframe, applied to the segment it opens
#[derive(Clone, Copy, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    Custom(EaseFn),
}

impl Easing {
    pub fn function(self) -> EaseFn {
        match self {
            Easing::Linear => linear,
            Easing::QuadIn => quad_ease_in,
            Easing::QuadOut => quad_ease_out,
            Easing::QuadInOut => quad_ease_in_out,
            Easing::Custom(f) => f,
        }
    }

    pub fn ease(self, current_time: f64, start: f64, distance: f64, duration: f64) -> f64 {
        (self.function())(current_time, start, distance, duration)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::QuadIn => f.write_str("QuadIn"),
            Easing::QuadOut => f.write_str("QuadOut"),
            Easing::QuadInOut => f.write_str("QuadInOut"),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CURVES: [Easing; 4] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
    ];

    #[test]
    fn test_curves_start_at_start() {
        for easing in CURVES {
            assert_relative_eq!(easing.ease(0.0, 3.0, 10.0, 8.0), 3.0);
        }
    }

    #[test]
    fn test_curves_reach_end_at_duration() {
        for easing in CURVES {
            assert_relative_eq!(easing.ease(8.0, 3.0, 10.0, 8.0), 13.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_quad_midpoints() {
        assert_relative_eq!(quad_ease_in(5.0, 0.0, 10.0, 10.0), 2.5);
        assert_relative_eq!(quad_ease_out(5.0, 0.0, 10.0, 10.0), 7.5);
        assert_relative_eq!(quad_ease_in_out(5.0, 0.0, 10.0, 10.0), 5.0);
        assert_relative_eq!(quad_ease_in_out(2.5, 0.0, 10.0, 10.0), 1.25);
        assert_relative_eq!(quad_ease_in_out(7.5, 0.0, 10.0, 10.0), 8.75);
    }

    #[test]
    fn test_custom_curve() {
        fn step(t: f64, start: f64, distance: f64, duration: f64) -> f64 {
            if t < duration {
                start
            } else {
                start + distance
            }
        }
        let easing = Easing::Custom(step);
        assert_eq!(easing.ease(4.0, 1.0, 2.0, 5.0), 1.0);
        assert_eq!(easing.ease(5.0, 1.0, 2.0, 5.0), 3.0);
        assert_eq!(format!("{easing:?}"), "Custom(..)");
        assert!(matches!(Easing::default(), Easing::Linear));
    }
}
