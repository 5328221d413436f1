//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{DraftRejection, OtpRejection, SignupRejection, ValidationError};

use thiserror::Error;

/// Core domain errors
///
/// Expected refusals (wrong code, expired draft) are not errors; see
/// [`OtpRejection`] and [`DraftRejection`].
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Infrastructure fault: hashing, randomness, poisoned locks, mail delivery
    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
