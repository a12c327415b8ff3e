//! Error types for lifting and notation decoding.
use thiserror::Error;

/// Why a lift produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiftError {
    /// The input lacks a list dimension the op requires. This is an expected
    /// outcome of inference (the `invalid` type), not a bug.
    #[error("invalid: input does not carry the {dims} list dimension(s) the op requires")]
    Invalid { dims: usize },

    #[error("nesting exceeds the maximum depth of {limit}")]
    TooDeep { limit: usize },
}

impl LiftError {
    pub fn is_invalid(&self) -> bool {
        matches!(self, LiftError::Invalid { .. })
    }
}

#[derive(Debug, Error)]
pub enum NotationError {
    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },
}
