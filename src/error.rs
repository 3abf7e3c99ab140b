//! Error types for mgat.

use thiserror::Error;

/// mgat error types.
#[derive(Error, Debug)]
pub enum MgatError {
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pattern name outside the fixed set of geometries
    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    /// Vector or matrix dimensions do not agree
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Probabilities are negative, non-finite, or do not sum to 1
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// A category with zero expected count was observed
    #[error("Degenerate distribution: category '{category}' has zero expected count but was observed")]
    DegenerateDistribution { category: String },

    /// An observed label has no entry in the reference distribution
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Empty input where non-empty was required
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The test statistic's reference distribution could not be built
    #[error("Statistics error: {0}")]
    Statistics(String),
}

/// Result type alias for mgat operations.
pub type Result<T> = std::result::Result<T, MgatError>;
