//! Errors for rejected model input.

/// Error raised when a value object cannot be built from user input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid aggregation keyword: {0}")]
    InvalidAggregation(String),

    #[error("Unknown join type: {0}")]
    UnknownJoinType(String),
}
