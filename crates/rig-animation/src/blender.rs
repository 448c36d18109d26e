//! Additive blending of concurrently playing animations
//!
//! [`AnimationBlender`] owns the set of [`PlayingAnimation`]s for one
//! skeleton. Each [`AnimationBlender::apply`] call resets the tree to its
//! rest pose and then adds every animation's weighted contribution.

use std::sync::Arc;

use rig_skeleton::CompiledTree;

use crate::expression::Environment;
use crate::keyframe::{AnimationData, LoopMode};
use crate::playing::PlayingAnimation;
use crate::resolver::apply_track;

/// Tuning for the blend pass
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BlendOptions {
    /// Animations whose effective weight magnitude is at or below this are skipped
    pub weight_epsilon: f32,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            weight_epsilon: 1e-6,
        }
    }
}

/// Drives every animation playing on one skeleton
#[derive(Debug, Clone, Default)]
pub struct AnimationBlender {
    playing: Vec<PlayingAnimation>,
    options: BlendOptions,
}

impl AnimationBlender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BlendOptions) -> Self {
        Self {
            playing: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &BlendOptions {
        &self.options
    }

    /// Start playing `animation` from time zero
    pub fn play(&mut self, animation: Arc<AnimationData>) -> &mut PlayingAnimation {
        log::debug!("Playing animation '{}'", animation.name);
        let index = self.playing.len();
        self.playing.push(PlayingAnimation::new(animation));
        &mut self.playing[index]
    }

    /// Stop every instance of the named animation, returning how many were removed
    pub fn stop(&mut self, name: &str) -> usize {
        let before = self.playing.len();
        self.playing.retain(|playing| playing.name() != name);
        before - self.playing.len()
    }

    pub fn clear(&mut self) {
        self.playing.clear();
    }

    /// Advance every animation; negative deltas are ignored
    pub fn tick(&mut self, delta: f32) {
        for playing in &mut self.playing {
            playing.advance(delta);
        }
    }

    pub fn set_time(&mut self, time: f32) {
        for playing in &mut self.playing {
            playing.set_time(time);
        }
    }

    pub fn set_weight(&mut self, weight: f32) {
        for playing in &mut self.playing {
            playing.set_weight(weight);
        }
    }

    /// Drop animations that have played to their end, returning how many
    pub fn remove_finished(&mut self) -> usize {
        let before = self.playing.len();
        self.playing.retain(|playing| {
            let done = playing.is_done();
            if done {
                log::debug!("Animation '{}' finished", playing.name());
            }
            !done
        });
        before - self.playing.len()
    }

    pub fn playing(&self) -> &[PlayingAnimation] {
        &self.playing
    }

    pub fn playing_mut(&mut self) -> &mut [PlayingAnimation] {
        &mut self.playing
    }

    pub fn get(&self, name: &str) -> Option<&PlayingAnimation> {
        self.playing.iter().find(|playing| playing.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayingAnimation> {
        self.playing.iter_mut().find(|playing| playing.name() == name)
    }

    pub fn is_idle(&self) -> bool {
        self.playing.is_empty()
    }

    /// Pose `tree` from the current playback state
    ///
    /// Every bone is reset first, which also clears copied transforms, so
    /// [`CompiledTree::copy_angles`] belongs after this call. Animations
    /// flagged `override_previous` reset the bones they animate before
    /// adding their own contribution.
    pub fn apply(&self, tree: &mut CompiledTree, env: &(impl Environment + ?Sized)) {
        tree.reset_transformation();

        for playing in &self.playing {
            let weight = playing.weight(env);
            if weight.abs() <= self.options.weight_epsilon {
                log::trace!("Skipping '{}' with weight {}", playing.name(), weight);
                continue;
            }

            let data = playing.animation();
            let time = playing.render_time();
            for track in &data.tracks {
                let Some(bone) = tree.bone_mut(&track.bone) else {
                    log::trace!(
                        "Animation '{}' targets unknown bone '{}'",
                        data.name,
                        track.bone
                    );
                    continue;
                };
                if data.override_previous {
                    bone.pose_mut().reset();
                }
                apply_track(track, time, weight, bone.pose_mut(), env);
            }
        }
    }

    /// Length at which the playing set repeats
    ///
    /// Returns the longest animation length when at least one animation
    /// loops or holds and `time` is already past that length; `None` means
    /// the sequence has no meaningful bound yet.
    pub fn sequence_length(&self, time: f32) -> Option<f32> {
        sequence_length(time, &self.playing)
    }
}

/// See [`AnimationBlender::sequence_length`]
pub fn sequence_length(time: f32, playing: &[PlayingAnimation]) -> Option<f32> {
    let repeats = playing
        .iter()
        .any(|playing| playing.loop_mode() != LoopMode::None);
    let length = playing
        .iter()
        .map(PlayingAnimation::length)
        .fold(0.0_f32, f32::max);

    (repeats && time > length).then_some(length)
}
