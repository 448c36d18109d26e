//! Keyframe animation for compiled skeletons
//!
//! Animations are plain data ([`AnimationData`] with per-bone
//! [`AnimationTrack`]s). An [`AnimationBlender`] plays any number of them at
//! once and, every frame, resolves each track through the
//! [`resolver`] and adds the weighted result into the bone poses of a
//! [`rig_skeleton::CompiledTree`].
//!
//! Keyframe components and blend weights may be expressions. They are
//! evaluated by an external [`Environment`]; any `Fn(&str, f32) -> f32`
//! closure works, and [`NoExpressions`] suffices for constant-only data.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glam::Vec3;
//! use rig_animation::{AnimationBlender, AnimationData, AnimationTrack, Channel, KeyFrame, LoopMode, NoExpressions};
//! use rig_skeleton::{BoneDefinition, compile};
//!
//! let mut tree = compile(64, 64, &[BoneDefinition::new("head")])?;
//!
//! let nod = AnimationData::new("nod", 1.0)
//!     .with_loop_mode(LoopMode::Loop)
//!     .with_track(AnimationTrack::new("head").with_rotation(Channel::new(vec![
//!         KeyFrame::constant(0.0, Vec3::ZERO),
//!         KeyFrame::constant(0.5, Vec3::new(20.0, 0.0, 0.0)),
//!         KeyFrame::constant(1.0, Vec3::ZERO),
//!     ])?));
//!
//! let mut blender = AnimationBlender::new();
//! blender.play(Arc::new(nod));
//! blender.tick(0.25);
//! blender.apply(&mut tree, &NoExpressions);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod blender;
pub mod easing;
pub mod error;
pub mod expression;
pub mod keyframe;
pub mod playing;
pub mod resolver;

pub use blender::{AnimationBlender, BlendOptions, sequence_length};
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use expression::{Environment, NoExpressions, Scalar};
pub use keyframe::{AnimationData, AnimationTrack, Channel, ChannelKind, KeyFrame, LoopMode};
pub use playing::PlayingAnimation;
pub use resolver::{apply_track, resolve};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
