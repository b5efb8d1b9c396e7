//! Luhn (mod 10) checksum, as used by payment card numbers.

use crate::{digit_value, ensure_ascii_digits, Rejection};

/// Run the Luhn check over `digits`.
///
/// Walking right to left, every second digit (starting with the one just left
/// of the check digit) is doubled, with 9 subtracted when the doubled value
/// exceeds 9. The number is valid when the total is a multiple of 10.
///
/// # Errors
///
/// - [`Rejection::BadLength`] for an empty string.
/// - [`Rejection::NonDigit`] if any character is not an ASCII digit.
/// - [`Rejection::ChecksumMismatch`] if the sum is not a multiple of 10.
pub fn check(digits: &str) -> Result<(), Rejection> {
    if digits.is_empty() {
        return Err(Rejection::BadLength);
    }
    ensure_ascii_digits(digits)?;

    let sum = digits
        .bytes()
        .rev()
        .enumerate()
        .fold(0u32, |acc, (i, b)| {
            let d = digit_value(b);
            let term = if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            };
            (acc + term) % 10
        });

    if sum == 0 {
        Ok(())
    } else {
        Err(Rejection::ChecksumMismatch)
    }
}

/// `true` iff `digits` is a non-empty ASCII digit string passing the Luhn check.
pub fn is_valid(digits: &str) -> bool {
    check(digits).is_ok()
}
