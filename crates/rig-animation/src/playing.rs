use std::sync::Arc;

use crate::expression::Environment;
use crate::keyframe::{AnimationData, LoopMode};

/// Playback cursor over one animation
#[derive(Debug, Clone)]
pub struct PlayingAnimation {
    animation: Arc<AnimationData>,
    time: f32,
    weight: f32,
    loop_mode: LoopMode,
}

impl PlayingAnimation {
    /// Start at time zero with full weight and the animation's own loop mode
    pub fn new(animation: Arc<AnimationData>) -> Self {
        let loop_mode = animation.loop_mode;
        Self {
            animation,
            time: 0.0,
            weight: 1.0,
            loop_mode,
        }
    }

    pub fn animation(&self) -> &AnimationData {
        &self.animation
    }

    pub fn name(&self) -> &str {
        &self.animation.name
    }

    pub fn length(&self) -> f32 {
        self.animation.length
    }

    /// Elapsed time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Advance by `delta` seconds; negative deltas are ignored
    pub fn advance(&mut self, delta: f32) {
        if delta > 0.0 {
            self.time += delta;
        }
    }

    pub fn weight_factor(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    /// Time at which keyframes are sampled this frame
    pub fn render_time(&self) -> f32 {
        let length = self.animation.length;
        match self.loop_mode {
            LoopMode::None => self.time,
            LoopMode::Loop => {
                if length > 0.0 {
                    self.time.rem_euclid(length)
                } else {
                    0.0
                }
            }
            LoopMode::HoldOnLastFrame => self.time.min(length),
        }
    }

    /// Only non-looping animations ever finish
    pub fn is_done(&self) -> bool {
        self.loop_mode == LoopMode::None && self.time >= self.animation.length
    }

    /// Effective blend weight: the weight factor times the animation's
    /// blend weight, resolved with the weight factor bound as `this`
    pub fn weight(&self, env: &(impl Environment + ?Sized)) -> f32 {
        if self.weight == 0.0 {
            return 0.0;
        }
        self.weight * self.animation.blend_weight.resolve(env, self.weight)
    }
}
