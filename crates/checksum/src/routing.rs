//! ABA routing transit number checksum.

use crate::{digit_value, ensure_ascii_digits, Rejection};

/// Every ABA routing number is exactly nine digits.
pub const ROUTING_LEN: usize = 9;

/// Repeating weights applied left to right.
const WEIGHTS: [u32; 3] = [3, 7, 1];

/// Validate a routing number.
///
/// `3*(d0+d3+d6) + 7*(d1+d4+d7) + (d2+d5+d8)` must be a multiple of 10.
///
/// # Errors
///
/// [`Rejection::NonDigit`], then [`Rejection::BadLength`] unless exactly nine
/// digits, then [`Rejection::ChecksumMismatch`].
pub fn check(digits: &str) -> Result<(), Rejection> {
    ensure_ascii_digits(digits)?;
    if digits.len() != ROUTING_LEN {
        return Err(Rejection::BadLength);
    }

    let sum: u32 = digits
        .bytes()
        .zip(WEIGHTS.iter().cycle())
        .map(|(b, w)| digit_value(b) * w)
        .sum();

    if sum % 10 == 0 {
        Ok(())
    } else {
        Err(Rejection::ChecksumMismatch)
    }
}

/// `true` iff `digits` is a nine-digit string passing the ABA checksum.
pub fn is_valid(digits: &str) -> bool {
    check(digits).is_ok()
}
