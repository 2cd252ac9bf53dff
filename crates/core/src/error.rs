//! Domain error model.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Deterministic failure of a domain rule. Remote and transport failures
/// belong to the data layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more fields failed validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A state transition the record does not allow (e.g. editing a sent order).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Malformed identifier text.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No such line, item or record inside an aggregate.
    #[error("not found")]
    NotFound,

    /// The record is already in the requested end state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    /// Single-field validation failure.
    pub fn validation(field: &'static str, msg: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, msg))
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}
