//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RrlsError {
    /// A parameter name is not recognized by the environment.
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A bound is malformed, e.g., `low > high` or not finite.
    #[error("Invalid bounds for parameter {name}: [{low}, {high}]")]
    InvalidBounds {
        /// Name of the parameter.
        name: String,
        /// Lower end of the interval.
        low: f64,
        /// Upper end of the interval.
        high: f64,
    },

    /// The length of a vector does not match the expected dimension.
    #[error("Dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// What was being checked.
        what: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Mixing weight outside of `[0, 1]`.
    #[error("Mixing weight alpha must be in [0, 1], got {0}")]
    InvalidAlpha(f32),

    /// Invalid mesh resolution.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// The simulator model cannot realize a parameter.
    #[error("Simulator model cannot realize parameter {param}: {reason}")]
    IncompatibleModel {
        /// Name of the parameter.
        param: String,
        /// Why the model is incompatible.
        reason: String,
    },

    /// The environment id is not registered.
    #[error("Unknown environment id: {0}")]
    UnknownEnvId(String),

    /// The task does not define the requested bounds variant.
    #[error("Task {task} has no {dim} bounds")]
    UnsupportedDim {
        /// Name of the task.
        task: String,
        /// Name of the variant.
        dim: String,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
