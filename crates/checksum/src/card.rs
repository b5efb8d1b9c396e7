//! Payment card brand classification and full card-number validation.
//!
//! Brand classification and the Luhn checksum are independent checks; a card
//! number is accepted only when both pass.

use serde::{Deserialize, Serialize};

use crate::{ensure_ascii_digits, luhn, Rejection};

/// Shortest accepted card number.
pub const MIN_CARD_LEN: usize = 13;

/// Longest accepted card number.
pub const MAX_CARD_LEN: usize = 19;

/// Card networks recognised by prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
}

impl CardBrand {
    /// Lowercase identifier, matching the serde representation.
    pub fn code(&self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Amex => "amex",
            CardBrand::Discover => "discover",
        }
    }

    /// Display name of the network.
    pub fn name(&self) -> &'static str {
        match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::Amex => "American Express",
            CardBrand::Discover => "Discover",
        }
    }
}

/// Classify a card number by its issuer prefix.
///
/// Returns `None` (unknown brand) for anything that matches no range, including
/// strings that are too short to carry the prefix or contain non-digits.
///
/// | Brand | Prefixes |
/// |---|---|
/// | Visa | `4` |
/// | Mastercard | `51`–`55`, `2221`–`2720` |
/// | Amex | `34`, `37` |
/// | Discover | `6011`, `622126`–`622925`, `644`–`649`, `65` |
pub fn classify(digits: &str) -> Option<CardBrand> {
    if ensure_ascii_digits(digits).is_err() {
        return None;
    }

    let in_range = |len: usize, lo: u32, hi: u32| {
        prefix_value(digits, len).is_some_and(|p| (lo..=hi).contains(&p))
    };

    if in_range(1, 4, 4) {
        Some(CardBrand::Visa)
    } else if in_range(2, 51, 55) || in_range(4, 2221, 2720) {
        Some(CardBrand::Mastercard)
    } else if in_range(2, 34, 34) || in_range(2, 37, 37) {
        Some(CardBrand::Amex)
    } else if in_range(4, 6011, 6011)
        || in_range(6, 622_126, 622_925)
        || in_range(3, 644, 649)
        || in_range(2, 65, 65)
    {
        Some(CardBrand::Discover)
    } else {
        None
    }
}

/// Validate a card number end to end and return its brand.
///
/// Expects bare digits; use [`normalize`] first on user-typed input.
///
/// # Errors
///
/// Checked in order: [`Rejection::NonDigit`], [`Rejection::BadLength`]
/// (outside 13–19 digits), [`Rejection::ChecksumMismatch`],
/// [`Rejection::UnknownBrand`].
pub fn validate(digits: &str) -> Result<CardBrand, Rejection> {
    ensure_ascii_digits(digits)?;
    if !(MIN_CARD_LEN..=MAX_CARD_LEN).contains(&digits.len()) {
        return Err(Rejection::BadLength);
    }
    luhn::check(digits)?;
    classify(digits).ok_or(Rejection::UnknownBrand)
}

/// Strip the spaces and dashes users type between digit groups.
///
/// Anything else is left in place so that [`validate`] can reject it.
pub fn normalize(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect()
}

/// Numeric value of the first `len` digits, or `None` if `digits` is shorter.
fn prefix_value(digits: &str, len: usize) -> Option<u32> {
    digits.get(..len)?.parse().ok()
}
