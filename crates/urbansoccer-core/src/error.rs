//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Messages are safe to show to a caller, with the exception of
/// `Infrastructure`, whose detail is meant for logs only.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The entity does not exist, or exists but is hidden from the caller.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The entity exists but belongs to somebody else.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Malformed or empty input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested transition is not allowed from the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The write would break a uniqueness rule.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller could not be identified.
    #[error("caller could not be authenticated")]
    Unauthenticated,

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
