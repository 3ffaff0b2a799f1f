//! Error taxonomy for the dynamics core.
//!
//! Configuration, binding and lookup failures are reported eagerly to the
//! caller. Nothing on the per-frame `step`/`transform` path returns an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DynamicsError {
    /// A parameter value or default lies outside `[min, max]`.
    #[error("Parameter '{name}' value {value} is outside its range [{min}, {max}].")]
    OutOfRange {
        name: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Unknown parameter '{0}'.")]
    UnknownParameter(String),

    #[error("Cannot integrate 0-dimensional model '{0}'.")]
    ZeroDimension(String),

    #[error("{kind} '{name}' is bound to a different model than the experiment.")]
    WrongModel { kind: ComponentKind, name: String },

    #[error(
        "{kind} exists already under the name '{existing}' (asked to add it as '{requested}')."
    )]
    Exists {
        kind: ComponentKind,
        existing: String,
        requested: String,
    },

    #[error("Unknown {kind} '{name}'.")]
    Unknown { kind: ComponentKind, name: String },

    #[error("No active {0} selected.")]
    NoActive(ComponentKind),

    #[error("Vector dimension mismatch: {left} != {right}.")]
    DimensionMismatch { left: usize, right: usize },
}

/// Which registry an experiment error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Integrator,
    Transformer,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentKind::Integrator => write!(f, "integrator"),
            ComponentKind::Transformer => write!(f, "transformer"),
        }
    }
}

pub type DynamicsResult<T> = std::result::Result<T, DynamicsError>;
