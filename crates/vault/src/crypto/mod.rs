//! Confidential field codec: encrypt, decrypt, mask, and re-key a single
//! sensitive string field for storage at rest.
//!
//! This module has no HTTP or configuration dependencies. Keys are always
//! passed in explicitly; nothing here reads process-wide state.
//!
//! # Stored format
//!
//! ```text
//! <hex(iv), 32 chars>:<hex(ciphertext+tag)>
//! ```
//!
//! A record-store value without `:` is legacy plaintext (see [`FieldValue`]).

pub mod cipher;
pub mod field;
pub mod key;

pub use cipher::{decrypt, encrypt, DecryptionError, EncryptionError};
pub use field::{mask, migrate, FieldValue};
pub use key::{FieldKey, KeyCache, KeyOrigin, KeySecret};

use thiserror::Error;

/// Either half of a decrypt-then-encrypt operation failing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error(transparent)]
    Encryption(#[from] EncryptionError),
    #[error(transparent)]
    Decryption(#[from] DecryptionError),
}

/// Re-encrypt a stored value from `from` to `to` with a fresh IV.
///
/// Used when rotating the field secret. Failures are returned immediately;
/// retrying with the same inputs cannot succeed.
///
/// # Errors
///
/// [`CodecError::Decryption`] if `stored` does not decrypt under `from`;
/// [`CodecError::Encryption`] if encryption under `to` fails.
pub fn reencrypt(stored: &str, from: &FieldKey, to: &FieldKey) -> Result<String, CodecError> {
    use zeroize::Zeroize;

    let mut plaintext = decrypt(stored, from)?;
    let result = encrypt(&plaintext, to);
    plaintext.zeroize();
    Ok(result?)
}
