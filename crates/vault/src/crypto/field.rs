//! Record-store field values: stored vs. legacy plaintext, masking, migration.

use zeroize::Zeroize;

use super::cipher::{self, DecryptionError, EncryptionError, SEPARATOR};
use super::key::FieldKey;

/// Prefix shown in place of the redacted part of a value.
pub const MASK_PREFIX: &str = "***-**-";

/// Number of trailing characters left visible by [`mask`].
pub const VISIBLE_SUFFIX: usize = 4;

/// Rendered when a value is too short to reveal a suffix safely.
const FULLY_MASKED: &str = "***-**-****";

/// A sensitive field as read back from the record store.
///
/// Stores that predate encryption still hold plaintext. Rather than sniff the
/// string at every call site, it is classified once by [`FieldValue::from_record`]
/// and every consumer matches on the variant.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// `hex(iv):hex(ciphertext)` written by [`cipher::encrypt`].
    Stored(String),
    /// Plaintext written before encryption was introduced.
    Legacy(String),
}

impl FieldValue {
    /// Classify a raw record-store string. A value without the `:` separator
    /// is legacy plaintext, never corrupt data.
    pub fn from_record(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.contains(SEPARATOR) {
            FieldValue::Stored(raw)
        } else {
            FieldValue::Legacy(raw)
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, FieldValue::Legacy(_))
    }
}

impl std::fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Stored(_) => f.write_str("Stored([REDACTED])"),
            FieldValue::Legacy(_) => f.write_str("Legacy([REDACTED])"),
        }
    }
}

/// Render `value` for display with only the last four characters visible.
///
/// Stored values are decrypted first; the plaintext is wiped as soon as the
/// masked form has been built. Both forms of the same value mask identically.
///
/// # Errors
///
/// [`DecryptionError`] if a stored value cannot be decrypted under `key`.
/// Legacy values never fail.
pub fn mask(value: &FieldValue, key: &FieldKey) -> Result<String, DecryptionError> {
    match value {
        FieldValue::Stored(stored) => {
            let mut plaintext = cipher::decrypt(stored, key)?;
            let masked = mask_plaintext(&plaintext);
            plaintext.zeroize();
            Ok(masked)
        }
        FieldValue::Legacy(plaintext) => Ok(mask_plaintext(plaintext)),
    }
}

/// Bring a value to its stored form: legacy plaintext is encrypted under
/// `key`, already-stored values are returned unchanged.
///
/// # Errors
///
/// [`EncryptionError`] if encryption fails.
pub fn migrate(value: FieldValue, key: &FieldKey) -> Result<String, EncryptionError> {
    match value {
        FieldValue::Stored(stored) => Ok(stored),
        FieldValue::Legacy(mut plaintext) => {
            let stored = cipher::encrypt(&plaintext, key);
            plaintext.zeroize();
            stored
        }
    }
}

fn mask_plaintext(plaintext: &str) -> String {
    let count = plaintext.chars().count();
    if count < VISIBLE_SUFFIX {
        return FULLY_MASKED.to_owned();
    }
    let suffix: String = plaintext.chars().skip(count - VISIBLE_SUFFIX).collect();
    format!("{MASK_PREFIX}{suffix}")
}
