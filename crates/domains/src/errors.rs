//! # DomainError
//!
//! Centralized error handling for the posts board.
//! Maps trust-layer and storage failures to actionable error types.

use thiserror::Error;

use crate::models::PostId;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// The one-time token was missing, already consumed, or issued to
    /// someone else. Absence and mismatch are deliberately indistinguishable.
    #[error("one-time token rejected")]
    InvalidToken,

    /// Post not found
    #[error("post {0} not found")]
    NotFound(PostId),

    /// Caller is neither the author of the post nor the administrator
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Validation failure (e.g. malformed post id)
    #[error("validation error: {0}")]
    Validation(String),

    /// Infrastructure failure (store down, entropy source unavailable)
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        DomainError::Internal(err.to_string())
    }
}

/// A specialized Result type for posts-board logic.
pub type Result<T> = std::result::Result<T, DomainError>;
