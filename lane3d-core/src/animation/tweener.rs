/// Frame-driven keyframe scheduler
///
/// Each tick mutates every animated node first and redraws once afterwards.
/// The graph is borrowed mutably while transforms are written and only
/// shared with the redraw callback once all of them are in place.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, TweenError};
use crate::scene::{NodeId, SceneGraph};
use crate::transform::Transform;

use super::interpolation::{ComponentWise, Interpolator, Segment};
use super::keyframe::Sprite;

pub const DEFAULT_FRAME_RATE: u32 = 24;
pub const DEFAULT_FINAL_FRAME: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenState {
    Idle,
    Running,
    Stopped,
}

/// How long an animation runs and how fast it ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenSettings {
    /// Last frame that is still evaluated
    pub final_frame: u32,
    /// Ticks per second
    pub frame_rate: u32,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            final_frame: DEFAULT_FINAL_FRAME,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

/// What a single [`KeyframeTweener::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// `frame` was evaluated and `updated` sprites found a bracketing pair
    Advanced { frame: u32, updated: usize },
    /// The final frame had already been passed; the tweener is now stopped
    Finished,
    /// The tweener is not running
    Inactive,
}

#[derive(Debug)]
pub struct KeyframeTweener {
    sprites: Vec<Sprite>,
    settings: TweenSettings,
    state: TweenState,
    current_frame: u32,
    interpolator: Box<dyn Interpolator>,
    initial_pose: Option<Vec<(NodeId, Transform)>>,
}

impl KeyframeTweener {
    /// An idle tweener; call [`start`](Self::start) to begin ticking
    pub fn new(sprites: Vec<Sprite>, settings: TweenSettings) -> Result<Self, TweenError> {
        if settings.frame_rate == 0 {
            return Err(TweenError::InvalidFrameRate);
        }
        debug!(
            "tweener created with {} sprites, final frame {} at {} fps",
            sprites.len(),
            settings.final_frame,
            settings.frame_rate
        );
        Ok(Self {
            sprites,
            settings,
            state: TweenState::Idle,
            current_frame: 0,
            interpolator: Box::new(ComponentWise),
            initial_pose: None,
        })
    }

    /// A tweener that is already running from frame 0
    pub fn initialize(
        sprites: Vec<Sprite>,
        final_frame: u32,
        frame_rate: Option<u32>,
    ) -> Result<Self, TweenError> {
        let settings = TweenSettings {
            final_frame,
            frame_rate: frame_rate.unwrap_or(DEFAULT_FRAME_RATE),
        };
        let mut tweener = Self::new(sprites, settings)?;
        tweener.start();
        Ok(tweener)
    }

    pub fn with_interpolator(mut self, interpolator: impl Interpolator + 'static) -> Self {
        self.interpolator = Box::new(interpolator);
        self
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TweenState::Running
    }

    /// Next frame to be evaluated
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn settings(&self) -> &TweenSettings {
        &self.settings
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Time between two ticks, `1000 / frame_rate` milliseconds
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.settings.frame_rate.max(1)))
    }

    /// Begin ticking from frame 0; only an idle tweener can start
    pub fn start(&mut self) {
        if self.state != TweenState::Idle {
            warn!("start ignored, tweener is {:?}", self.state);
            return;
        }
        self.state = TweenState::Running;
        self.current_frame = 0;
        debug!("tweener started");
    }

    /// Stop ticking; transforms and the frame counter stay where they are
    pub fn stop(&mut self) {
        if self.state == TweenState::Running {
            debug!("tweener stopped at frame {}", self.current_frame);
        }
        self.state = TweenState::Stopped;
    }

    /// Back to idle at frame 0 so the tweener can be started again.
    /// Node transforms are left alone; see
    /// [`restore_initial_pose`](Self::restore_initial_pose).
    pub fn rewind(&mut self) {
        self.state = TweenState::Idle;
        self.current_frame = 0;
        debug!("tweener rewound");
    }

    /// Evaluate the current frame for every sprite, call `redraw` once, and
    /// advance the frame counter.
    pub fn tick<F>(&mut self, graph: &mut SceneGraph, mut redraw: F) -> Result<TickOutcome, TweenError>
    where
        F: FnMut(&SceneGraph) -> Result<(), SceneError>,
    {
        if self.state != TweenState::Running {
            return Ok(TickOutcome::Inactive);
        }
        if self.current_frame > self.settings.final_frame {
            self.state = TweenState::Stopped;
            info!("animation finished after frame {}", self.settings.final_frame);
            return Ok(TickOutcome::Finished);
        }

        self.check_targets(graph)?;
        self.capture_initial_pose(graph)?;

        let frame = self.current_frame;
        let staged = match self.stage_frame(graph, frame) {
            Ok(staged) => staged,
            Err(err) => {
                self.state = TweenState::Stopped;
                warn!("animation stopped at frame {frame}: {err}");
                return Err(err);
            }
        };
        let updated = staged.len();
        for (target, next) in staged {
            graph.set_transform(target, next)?;
        }

        redraw(graph)?;
        trace!("frame {frame}: {updated} sprites updated");

        self.current_frame += 1;
        Ok(TickOutcome::Advanced { frame, updated })
    }

    /// Tick at a fixed timestep until the tweener stops. An idle tweener is
    /// started first. Returns the number of frames evaluated.
    pub fn run<F>(&mut self, graph: &mut SceneGraph, mut redraw: F) -> Result<u32, TweenError>
    where
        F: FnMut(&SceneGraph) -> Result<(), SceneError>,
    {
        if self.state == TweenState::Idle {
            self.start();
        }
        info!(
            "running animation to frame {} at {} fps",
            self.settings.final_frame, self.settings.frame_rate
        );

        let interval = self.frame_interval();
        let mut frames = 0;
        while self.is_running() {
            let started = Instant::now();
            if let TickOutcome::Advanced { .. } = self.tick(graph, &mut redraw)? {
                frames += 1;
            }
            if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                if self.is_running() {
                    thread::sleep(remaining);
                }
            }
        }
        Ok(frames)
    }

    /// Put every animated node back into the pose it had on the first tick.
    /// Returns `false` when no tick has run yet.
    pub fn restore_initial_pose(&self, graph: &mut SceneGraph) -> Result<bool, TweenError> {
        let Some(pose) = &self.initial_pose else {
            return Ok(false);
        };
        for &(target, transform) in pose {
            graph
                .set_transform(target, transform)
                .map_err(|_| TweenError::MissingTarget(target))?;
        }
        debug!("restored initial pose of {} nodes", pose.len());
        Ok(true)
    }

    /// Interpolate every sprite for `frame` without touching the graph.
    /// Fails if any resulting transform has no valid local matrix.
    fn stage_frame(
        &self,
        graph: &SceneGraph,
        frame: u32,
    ) -> Result<Vec<(NodeId, Transform)>, TweenError> {
        let mut staged: Vec<(NodeId, Transform)> = Vec::new();
        for sprite in &self.sprites {
            let Some((from, to)) = sprite.interval(frame) else {
                continue;
            };
            let target = sprite.target();
            let live = match staged.iter().rev().find(|(id, _)| *id == target) {
                Some((_, transform)) => *transform,
                None => *graph.transform(target)?,
            };
            let next = self
                .interpolator
                .interpolate(&Segment::new(from, to, frame), &live);
            next.local_matrix().map_err(SceneError::from)?;
            staged.push((target, next));
        }
        Ok(staged)
    }

    fn check_targets(&self, graph: &SceneGraph) -> Result<(), TweenError> {
        match self.sprites.iter().find(|s| !graph.contains(s.target())) {
            Some(sprite) => Err(TweenError::MissingTarget(sprite.target())),
            None => Ok(()),
        }
    }

    fn capture_initial_pose(&mut self, graph: &SceneGraph) -> Result<(), TweenError> {
        if self.initial_pose.is_some() {
            return Ok(());
        }
        let pose = self
            .sprites
            .iter()
            .map(|sprite| Ok((sprite.target(), *graph.transform(sprite.target())?)))
            .collect::<Result<Vec<_>, SceneError>>()?;
        self.initial_pose = Some(pose);
        Ok(())
    }
}
