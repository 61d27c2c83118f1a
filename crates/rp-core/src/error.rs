//! # AppError
//!
//! Centralized error handling for the portal core.
//! Store mutators never fail; these variants cover the orchestration layer
//! and the adapters behind the ports.

use thiserror::Error;

/// The primary error type for all rp-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Post)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., blank comment, malformed storage key)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Rejected by the access policy
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An assistant request is already in flight
    #[error("conflict: {0}")]
    Conflict(String),
}

/// A specialized Result type for portal logic.
pub type Result<T> = std::result::Result<T, AppError>;
