//! Reason codes for rejected identifiers and dates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a candidate value was rejected.
///
/// The `Display` text is safe to show to end users: it never echoes the
/// rejected value, which may itself be sensitive (card numbers in particular).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection {
    /// Empty, or the wrong number of digits for the declared category.
    #[error("the number has an invalid length")]
    BadLength,

    /// Contains something other than ASCII digits.
    #[error("the number may only contain digits")]
    NonDigit,

    /// Structurally valid, but the check digit does not match.
    #[error("the number failed its checksum")]
    ChecksumMismatch,

    /// Passes the checksum but matches no known card brand.
    #[error("the card brand is not supported")]
    UnknownBrand,

    /// The birth date lies after the reference date.
    #[error("the birth date is in the future")]
    FutureDate,

    /// The computed age is below the required minimum.
    #[error("the minimum age requirement is not met")]
    BelowMinimumAge,

    /// The birth date is not a `YYYY-MM-DD` calendar date.
    #[error("the birth date is not a valid date")]
    MalformedDate,
}

impl Rejection {
    /// Stable, machine-readable reason code (e.g. `"checksum-mismatch"`).
    ///
    /// This is the only part of a rejection that may be logged.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::BadLength => "bad-length",
            Rejection::NonDigit => "non-digit",
            Rejection::ChecksumMismatch => "checksum-mismatch",
            Rejection::UnknownBrand => "unknown-brand",
            Rejection::FutureDate => "future-date",
            Rejection::BelowMinimumAge => "below-minimum-age",
            Rejection::MalformedDate => "malformed-date",
        }
    }

    /// `true` when the input never had the right shape to begin with, as
    /// opposed to a well-formed value that failed a semantic check.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Rejection::BadLength | Rejection::NonDigit | Rejection::MalformedDate
        )
    }
}
