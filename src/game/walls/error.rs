use thiserror::Error;

/// Result type for wall operations
pub type Result<T> = std::result::Result<T, WallError>;

/// Hard failures of the wall subsystem.
///
/// Everything else (collisions, missing funds, empty removals) is a soft
/// outcome reported through return values, not an error.
#[derive(Error, Debug)]
pub enum WallError {
    #[error("Degenerate wall geometry: start and end are {length} apart")]
    DegenerateGeometry { length: f32 },

    #[error("Invalid wall dimensions: height {height}, thickness {thickness}")]
    InvalidDimensions { height: f32, thickness: f32 },

    #[error("Invalid segment length: {0}")]
    InvalidSegmentLength(f32),

    #[error("Unknown wall type: {0}")]
    UnknownWallType(u32),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
