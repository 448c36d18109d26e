//! Animation data: keyframes, channels, per-bone tracks and whole animations

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::expression::{Scalar, constant_triplet};

/// A single keyframe of one channel
///
/// `pre` is the value used when arriving at this frame, `post` when
/// leaving it. They are equal unless the curve is discontinuous here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyFrame {
    pub time: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub easing: Easing,
    pub pre: [Scalar; 3],
    pub post: [Scalar; 3],
}

impl KeyFrame {
    pub fn new(time: f32, value: [Scalar; 3]) -> Self {
        Self {
            time,
            easing: Easing::Linear,
            pre: value.clone(),
            post: value,
        }
    }

    /// Keyframe with constant components
    pub fn constant(time: f32, value: Vec3) -> Self {
        Self::new(time, constant_triplet(value))
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_post(mut self, post: [Scalar; 3]) -> Self {
        self.post = post;
        self
    }
}

/// Which part of a bone's pose a channel drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Position,
    Rotation,
    Scale,
}

impl ChannelKind {
    /// Value of the channel when nothing is keyed
    pub fn start_value(self) -> f32 {
        match self {
            Self::Position | Self::Rotation => 0.0,
            Self::Scale => 1.0,
        }
    }
}

/// Keyframes of one channel, strictly ordered by time
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<KeyFrame>", into = "Vec<KeyFrame>"))]
pub struct Channel {
    frames: Vec<KeyFrame>,
}

impl Channel {
    /// Build a channel, rejecting out-of-order, duplicate or NaN times
    pub fn new(frames: Vec<KeyFrame>) -> Result<Self> {
        let mut previous: Option<f32> = None;
        for frame in &frames {
            let ordered = match previous {
                Some(previous) => frame.time > previous,
                None => !frame.time.is_nan(),
            };
            if !ordered {
                return Err(AnimationError::UnorderedKeyframes { time: frame.time });
            }
            previous = Some(frame.time);
        }
        Ok(Self { frames })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[KeyFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TryFrom<Vec<KeyFrame>> for Channel {
    type Error = AnimationError;

    fn try_from(frames: Vec<KeyFrame>) -> Result<Self> {
        Self::new(frames)
    }
}

impl From<Channel> for Vec<KeyFrame> {
    fn from(channel: Channel) -> Self {
        channel.frames
    }
}

/// Position, rotation and scale channels for one named bone
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationTrack {
    pub bone: String,
    pub position: Channel,
    pub rotation: Channel,
    pub scale: Channel,
}

impl AnimationTrack {
    pub fn new(bone: impl Into<String>) -> Self {
        Self {
            bone: bone.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, channel: Channel) -> Self {
        self.position = channel;
        self
    }

    pub fn with_rotation(mut self, channel: Channel) -> Self {
        self.rotation = channel;
        self
    }

    pub fn with_scale(mut self, channel: Channel) -> Self {
        self.scale = channel;
        self
    }

    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::Position => &self.position,
            ChannelKind::Rotation => &self.rotation,
            ChannelKind::Scale => &self.scale,
        }
    }
}

/// What happens once playback passes the end of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum LoopMode {
    /// Keep sampling past the end; the animation reports itself done
    #[default]
    None,
    Loop,
    HoldOnLastFrame,
}

impl LoopMode {
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Loop => "loop",
            Self::HoldOnLastFrame => "hold_on_last_frame",
        }
    }
}

impl FromStr for LoopMode {
    type Err = AnimationError;

    /// Also accepts `"true"`/`"false"` as written by older exporters
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "false" => Ok(Self::None),
            "loop" | "true" => Ok(Self::Loop),
            "hold_on_last_frame" => Ok(Self::HoldOnLastFrame),
            _ => Err(AnimationError::UnknownLoopMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for LoopMode {
    type Error = AnimationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<LoopMode> for String {
    fn from(mode: LoopMode) -> Self {
        mode.name().to_string()
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complete animation as decoded from an asset
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationData {
    pub name: String,
    pub loop_mode: LoopMode,
    /// Resolved with the playing animation's weight factor bound as `this`
    pub blend_weight: Scalar,
    /// Length in seconds
    pub length: f32,
    /// Tracks of this animation replace, rather than add to, earlier ones
    pub override_previous: bool,
    pub tracks: Vec<AnimationTrack>,
}

impl Default for AnimationData {
    fn default() -> Self {
        Self {
            name: String::new(),
            loop_mode: LoopMode::None,
            blend_weight: Scalar::ONE,
            length: 0.0,
            override_previous: false,
            tracks: Vec::new(),
        }
    }
}

impl AnimationData {
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            length,
            ..Self::default()
        }
    }

    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    pub fn with_blend_weight(mut self, blend_weight: impl Into<Scalar>) -> Self {
        self.blend_weight = blend_weight.into();
        self
    }

    pub fn with_override_previous(mut self, override_previous: bool) -> Self {
        self.override_previous = override_previous;
        self
    }

    pub fn with_track(mut self, track: AnimationTrack) -> Self {
        self.tracks.push(track);
        self
    }

    pub fn track(&self, bone: &str) -> Option<&AnimationTrack> {
        self.tracks.iter().find(|track| track.bone == bone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_rejects_unordered_times() {
        let frames = vec![
            KeyFrame::constant(0.0, Vec3::ZERO),
            KeyFrame::constant(1.0, Vec3::ONE),
            KeyFrame::constant(0.5, Vec3::ONE),
        ];
        assert_eq!(
            Channel::new(frames),
            Err(AnimationError::UnorderedKeyframes { time: 0.5 })
        );
    }

    #[test]
    fn test_channel_rejects_duplicate_times() {
        let frames = vec![
            KeyFrame::constant(1.0, Vec3::ZERO),
            KeyFrame::constant(1.0, Vec3::ONE),
        ];
        assert!(Channel::new(frames).is_err());
    }

    #[test]
    fn test_channel_rejects_nan() {
        assert!(Channel::new(vec![KeyFrame::constant(f32::NAN, Vec3::ZERO)]).is_err());
    }

    #[test]
    fn test_loop_mode_parsing() {
        assert_eq!("loop".parse::<LoopMode>(), Ok(LoopMode::Loop));
        assert_eq!("true".parse::<LoopMode>(), Ok(LoopMode::Loop));
        assert_eq!("hold_on_last_frame".parse::<LoopMode>(), Ok(LoopMode::HoldOnLastFrame));
        assert_eq!("false".parse::<LoopMode>(), Ok(LoopMode::None));
        assert_eq!(
            "forever".parse::<LoopMode>(),
            Err(AnimationError::UnknownLoopMode("forever".to_string()))
        );
    }

    #[test]
    fn test_track_lookup() {
        let data = AnimationData::new("walk", 1.0)
            .with_track(AnimationTrack::new("leg"))
            .with_track(AnimationTrack::new("arm"));
        assert!(data.track("arm").is_some());
        assert!(data.track("tail").is_none());
        assert_eq!(data.blend_weight, Scalar::ONE);
    }
}
