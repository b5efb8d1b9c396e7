//! AES-256-GCM encryption and decryption of individual string fields.
//!
//! **Algorithm choice:** AES-256-GCM with a 128-bit IV drawn fresh from the OS
//! CSPRNG on every call. Encrypting the same plaintext twice therefore yields
//! two unrelated stored values, and the GCM tag makes any modification of the
//! stored value fail decryption instead of producing wrong plaintext.

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};
use thiserror::Error;

use super::key::{FieldKey, KEY_LEN};

/// Byte length of the per-call initialisation vector.
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Separates the hex IV from the hex ciphertext in the stored representation.
pub const SEPARATOR: char = ':';

/// AES-256-GCM instantiated with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced when encrypting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptionError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// AES-GCM encryption failed.
    #[error("aead encryption failed")]
    AeadFailure,
}

/// Errors produced when decrypting a stored value.
///
/// None of these mean "not yet encrypted"; legacy plaintext is identified
/// before decryption is attempted (see [`FieldValue`](super::FieldValue)).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecryptionError {
    /// No `:` between IV and ciphertext.
    #[error("stored value has no iv separator")]
    MissingSeparator,

    /// The IV is not exactly [`IV_LEN`] hex-encoded bytes.
    #[error("stored value has a malformed iv")]
    MalformedIv,

    /// The ciphertext is not hex, or is too short to hold a tag.
    #[error("stored value has malformed ciphertext")]
    MalformedCiphertext,

    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// Authentication failed: wrong key, truncated, or tampered data.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Decrypted bytes are not UTF-8.
    #[error("decrypted value is not valid UTF-8")]
    InvalidUtf8,
}

/// A parsed, encrypted field value.
///
/// The string representation is `<hex(iv)>:<hex(ciphertext+tag)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredField {
    /// Raw IV bytes.
    pub iv: [u8; IV_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

impl StoredField {
    /// Encode this value to its canonical string representation (lowercase hex).
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}{}{}",
            hex::encode(self.iv),
            SEPARATOR,
            hex::encode(&self.ciphertext),
        )
    }

    /// Parse a stored field string, splitting on the first `:`.
    ///
    /// # Errors
    ///
    /// [`DecryptionError::MissingSeparator`], [`DecryptionError::MalformedIv`],
    /// or [`DecryptionError::MalformedCiphertext`].
    pub fn parse(s: &str) -> Result<Self, DecryptionError> {
        let (iv_hex, ct_hex) = s
            .split_once(SEPARATOR)
            .ok_or(DecryptionError::MissingSeparator)?;

        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| DecryptionError::MalformedIv)?;

        let ciphertext = hex::decode(ct_hex).map_err(|_| DecryptionError::MalformedCiphertext)?;
        if ciphertext.len() < TAG_LEN {
            return Err(DecryptionError::MalformedCiphertext);
        }

        Ok(Self { iv, ciphertext })
    }
}

/// Encrypt `plaintext` under `key`, returning the stored representation.
///
/// # Errors
///
/// See [`encrypt_field`].
pub fn encrypt(plaintext: &str, key: &FieldKey) -> Result<String, EncryptionError> {
    encrypt_field(plaintext.as_bytes(), key.as_bytes()).map(|f| f.to_string_repr())
}

/// Decrypt a stored representation produced by [`encrypt`].
///
/// # Errors
///
/// Any [`DecryptionError`]; see [`StoredField::parse`] and [`decrypt_field`].
pub fn decrypt(stored: &str, key: &FieldKey) -> Result<String, DecryptionError> {
    let field = StoredField::parse(stored)?;
    let plaintext = decrypt_field(&field, key.as_bytes())?;
    String::from_utf8(plaintext).map_err(|_| DecryptionError::InvalidUtf8)
}

/// Encrypt raw bytes with a fresh random IV.
///
/// # Errors
///
/// Returns [`EncryptionError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`EncryptionError::AeadFailure`] on an internal AEAD error (should be
/// unreachable with a valid key).
pub fn encrypt_field(plaintext: &[u8], key: &[u8]) -> Result<StoredField, EncryptionError> {
    let cipher = build_cipher(key).ok_or(EncryptionError::InvalidKeyLength(key.len()))?;

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), plaintext)
        .map_err(|_| EncryptionError::AeadFailure)?;

    Ok(StoredField { iv, ciphertext })
}

/// Decrypt a [`StoredField`] back to plaintext bytes.
///
/// # Errors
///
/// Returns [`DecryptionError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`DecryptionError::AuthenticationFailed`] if the tag does not verify.
pub fn decrypt_field(field: &StoredField, key: &[u8]) -> Result<Vec<u8>, DecryptionError> {
    let cipher = build_cipher(key).ok_or(DecryptionError::InvalidKeyLength(key.len()))?;
    cipher
        .decrypt(Nonce::<U16>::from_slice(&field.iv), field.ciphertext.as_ref())
        .map_err(|_| DecryptionError::AuthenticationFailed)
}

/// `None` unless `key` is exactly [`KEY_LEN`] bytes.
fn build_cipher(key: &[u8]) -> Option<Aes256Gcm16> {
    if key.len() != KEY_LEN {
        return None;
    }
    Aes256Gcm16::new_from_slice(key).ok()
}
