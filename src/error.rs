use thiserror::Error;

/// Top-level error type for the starpath timeline.
#[derive(Debug, Error)]
pub enum StarpathError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// A curve query was made outside its parameter domain.
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while building a path.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Errors from the audio output side.
///
/// These never escape the cue dispatcher: they are logged and the engine
/// degrades to silence.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("audio playback failed: {0}")]
    PlaybackFailed(String),
}

/// Errors related to configuration and waypoint records.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid waypoint {name:?}: {reason}")]
    InvalidWaypoint { name: String, reason: String },

    #[error("duplicate waypoint name {0:?}")]
    DuplicateName(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Convenience type alias for results using [`StarpathError`].
pub type Result<T> = std::result::Result<T, StarpathError>;
