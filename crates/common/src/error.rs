//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Conflict`] → 409
/// - [`ServiceError::DecryptionFailure`] → 422
/// - [`ServiceError::NotEncrypted`] → 422
/// - [`ServiceError::EncryptionFailure`] → 500
///
/// Messages must never contain field plaintext, ciphertext, or key material.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — missing field or invalid JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request conflicts with the current key configuration (e.g. a
    /// rotation was requested but no previous key is configured).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be decrypted: malformed, wrong key, or tampered.
    #[error("decryption failure: {0}")]
    DecryptionFailure(String),

    /// A value expected to be stored ciphertext is legacy plaintext.
    #[error("not encrypted: {0}")]
    NotEncrypted(String),

    /// Encryption failed due to a crypto-layer error.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Conflict(_) => 409,
            ServiceError::DecryptionFailure(_) => 422,
            ServiceError::NotEncrypted(_) => 422,
            ServiceError::EncryptionFailure(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::DecryptionFailure(_) => "decryption_failed",
            ServiceError::NotEncrypted(_) => "not_encrypted",
            ServiceError::EncryptionFailure(_) => "encryption_failed",
        }
    }
}
