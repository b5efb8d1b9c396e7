//! Request and response types exchanged with the transport layer.
//!
//! These types are serialised as JSON. Field values that carry plaintext
//! (`value` on the field endpoints) must never be logged by either side.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Field codec endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /fields/encrypt`, `/fields/mask`, and `/fields/migrate`.
///
/// For `/fields/mask` and `/fields/migrate`, `value` is whatever the record
/// store holds: either a stored `<iv>:<ciphertext>` string or legacy plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRequest {
    pub value: String,
}

/// Request body for `POST /fields/decrypt` and `/fields/rotate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFieldRequest {
    /// `hex(iv) ":" hex(ciphertext)`.
    pub stored: String,
}

/// Response body carrying a value ready for the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFieldResponse {
    pub stored: String,
}

/// Response body for `POST /fields/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainFieldResponse {
    pub value: String,
}

/// Response body for `POST /fields/mask`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskedFieldResponse {
    /// Display form, e.g. `***-**-1234`.
    pub masked: String,
}

// ---------------------------------------------------------------------------
// Validation endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /validate`, tagged by `kind`.
///
/// ```json
/// {"kind": "card", "value": "4532 0151 1283 0366"}
/// {"kind": "bank_transfer", "value": "021000021"}
/// {"kind": "birth_date", "value": "2001-04-30"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidateRequest {
    Card { value: String },
    BankTransfer { value: String },
    BirthDate { value: String },
}

/// Response body for `POST /validate`.
///
/// Rejections are a normal outcome and are returned with `200 OK`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub accepted: bool,
    /// Reason code such as `"checksum-mismatch"`; absent when accepted.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
    /// Human-readable reason, never containing the submitted value.
    pub reason: String,
    /// Card brand for accepted card numbers.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub brand: Option<String>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether the field key has been derived.
    pub key_ready: bool,
    /// Whether the field key comes from the development-only fallback secret.
    pub dev_key: bool,
    /// Whether a previous key is configured for rotation.
    pub rotation_enabled: bool,
}
