use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Declared shape of a tensor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Vector(usize),
    Matrix(usize, usize),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Vector(len) => write!(f, "[{len}]"),
            Shape::Matrix(rows, cols) => write!(f, "[{rows} x {cols}]"),
        }
    }
}

/// Errors surfaced while building model inputs or rendering output.
///
/// The engines themselves never fail: every precondition is checked once when
/// [`ModelInputs`](crate::ModelInputs) is constructed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A tensor argument disagrees with `A`, `N2`, `SI_CUT` or `N2 - N0`.
    #[error("`{name}` has shape {found}, expected {expected}")]
    ShapeMismatch {
        name: &'static str,
        expected: Shape,
        found: Shape,
    },

    /// A day or age index points outside the simulated range.
    #[error("`{name}` index {index} is out of range (limit {limit})")]
    InvalidPolicyIndex {
        name: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("invalid dimension `{name}`: {reason}")]
    InvalidDimension { name: &'static str, reason: String },

    #[error("population of age group {age} must be positive, got {value}")]
    NonPositivePopulation { age: usize, value: f64 },

    #[error("average contact rate must be positive and finite, got {value}")]
    InvalidContactRate { value: f64 },

    #[error("failed to parse JSON model config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML model config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
