//! Keyframe channel evaluation
//!
//! A channel is sampled by finding the keyframe pair bracketing the target
//! time, computing the linear progress between them and remapping it
//! through the destination keyframe's easing. Catmull-Rom keyframes
//! interpolate along a spline through the neighbouring keyframes instead.

use glam::Vec3;
use rig_skeleton::AnimationPose;

use crate::expression::{Environment, resolve_triplet};
use crate::keyframe::{AnimationTrack, Channel, ChannelKind, KeyFrame};

/// Evaluate `channel` at `time` seconds
///
/// Expression components are resolved with the channel's start value
/// (0 for position and rotation, 1 for scale) bound as `this`.
pub fn resolve(
    channel: &Channel,
    kind: ChannelKind,
    time: f32,
    env: &(impl Environment + ?Sized),
) -> Vec3 {
    let start = kind.start_value();
    let frames = channel.frames();

    match frames {
        [] => Vec3::splat(start),
        [only] => resolve_triplet(&only.post, env, start),
        _ => {
            let (index, to) = bracket(frames, time);
            let from = index.checked_sub(1).and_then(|i| frames.get(i));

            let offset = from.map_or(0.0, |frame| frame.time);
            let span = to.time - offset;
            let progress = if span > 0.0 {
                ((time - offset) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };

            let from_value = from.map_or(Vec3::splat(start), |frame| {
                resolve_triplet(&frame.post, env, start)
            });
            let to_value = resolve_triplet(&to.pre, env, start);

            if to.easing.is_spline() {
                let before = index
                    .checked_sub(2)
                    .and_then(|i| frames.get(i))
                    .map_or(from_value, |frame| resolve_triplet(&frame.post, env, start));
                let after = frames
                    .get(index + 1)
                    .map_or(to_value, |frame| resolve_triplet(&frame.pre, env, start));
                catmull_rom(before, from_value, to_value, after, progress)
            } else {
                lerp(from_value, to_value, to.easing.apply(progress))
            }
        }
    }
}

/// First keyframe at or after `time`, or the last keyframe
///
/// A keyframe at exactly time zero never ends a bracket; it only ever
/// serves as the `from` side.
fn bracket(frames: &[KeyFrame], time: f32) -> (usize, &KeyFrame) {
    let last = frames.len() - 1;
    frames
        .iter()
        .enumerate()
        .find(|&(i, frame)| !((frame.time < time && i < last) || frame.time == 0.0))
        .unwrap_or((last, &frames[last]))
}

/// Linear interpolation exact at both ends
fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from * (1.0 - t) + to * t
}

/// Uniform Catmull-Rom spline between `p1` and `p2`
fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Add one track's weighted contribution to `pose`
///
/// Position and rotation are scaled by `weight`; scale contributes
/// `(value - 1) * weight` so that unit scale is neutral.
pub fn apply_track(
    track: &AnimationTrack,
    time: f32,
    weight: f32,
    pose: &mut AnimationPose,
    env: &(impl Environment + ?Sized),
) {
    let sample = |channel: &Channel, kind: ChannelKind| {
        if channel.is_empty() {
            Vec3::splat(kind.start_value())
        } else {
            resolve(channel, kind, time, env)
        }
    };

    let position = sample(&track.position, ChannelKind::Position);
    let rotation = sample(&track.rotation, ChannelKind::Rotation);
    let scale = sample(&track.scale, ChannelKind::Scale);

    pose.add(
        position * weight,
        rotation * weight,
        (scale - Vec3::ONE) * weight,
    );
}
