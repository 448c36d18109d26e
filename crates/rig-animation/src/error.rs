use thiserror::Error;

/// Errors raised while building animation data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("keyframe at {time}s does not come after the previous keyframe")]
    UnorderedKeyframes { time: f32 },

    #[error("unknown easing: {0}")]
    UnknownEasing(String),

    #[error("unknown loop mode: {0}")]
    UnknownLoopMode(String),
}

/// Result type for animation construction
pub type Result<T> = std::result::Result<T, AnimationError>;
