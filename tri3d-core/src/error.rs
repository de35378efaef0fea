/// Error types surfaced by the core
///
/// Degenerate geometry and empty viewports are not errors: the rasterizer
/// skips or short-circuits them. What remains are programming errors when
/// building a matrix and malformed textual parameters.

/// Errors raised while constructing a [`RotationMatrix`](crate::RotationMatrix).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    #[error("matrix must have 9 elements, got {0}")]
    ElementCount(usize),

    #[error("matrix is not orthonormal (max deviation {deviation:e})")]
    NotOrthonormal { deviation: f64 },
}

/// Errors raised while parsing shape and color descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown shape descriptor: {0:?}")]
    UnknownShape(String),

    #[error("subdivision level {level} exceeds the maximum of {max}")]
    LevelTooHigh { level: u32, max: u32 },

    #[error("malformed color descriptor: {0:?}")]
    MalformedColor(String),
}
