use thiserror::Error;

/// Errors that abort compilation of a bone list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    #[error("circular bone reference involving '{0}'")]
    CircularReference(String),

    #[error("duplicate bone name: {0}")]
    DuplicateBone(String),

    #[error("invalid poly mesh on bone '{bone}': {reason}")]
    InvalidPolyMesh { bone: String, reason: String },

    #[error("uv rotation must be a multiple of 90 degrees, got {0}")]
    InvalidUvRotation(i32),
}

/// Result type for skeleton compilation
pub type Result<T> = std::result::Result<T, CompileError>;
