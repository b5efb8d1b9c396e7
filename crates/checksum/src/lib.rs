//! Check-digit and eligibility validators shared by every layer that accepts
//! payment card numbers, bank routing numbers, or birth dates.
//!
//! Every function here is pure: no I/O, no shared state, no panics on malformed
//! input. Malformed input is simply invalid and reported through [`Rejection`],
//! which keeps "structurally wrong" separate from "fails its checksum".
//!
//! Callers at a trust boundary usually want [`validate`] or
//! [`validate_birth_date`], which wrap the individual predicates into a
//! [`Verdict`] carrying a reason code and a human-readable message.

pub mod age;
pub mod card;
pub mod luhn;
pub mod rejection;
pub mod routing;
pub mod verdict;

pub use card::CardBrand;
pub use rejection::Rejection;
pub use verdict::{validate, validate_birth_date, ValidationContext, Verdict};

/// Returns `Err(NonDigit)` unless every byte of `digits` is an ASCII digit.
///
/// An empty string passes; length rules are the caller's concern.
pub(crate) fn ensure_ascii_digits(digits: &str) -> Result<(), Rejection> {
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Rejection::NonDigit)
    }
}

/// Numeric value of the digit byte `b`. Callers must have run
/// [`ensure_ascii_digits`] first.
#[inline]
pub(crate) fn digit_value(b: u8) -> u32 {
    u32::from(b - b'0')
}
