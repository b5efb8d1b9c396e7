//! Calendar age and minimum-age eligibility.
//!
//! Only birth dates are ever persisted; age is recomputed against a reference
//! date on every check. Eligibility is inclusive at the boundary: someone whose
//! birthday is exactly `min_years` years before the reference date qualifies.

use chrono::{Datelike, NaiveDate};

use crate::Rejection;

/// Accepted textual form of a birth date.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole years between `birth` and `reference`.
///
/// The year difference is reduced by one when `reference`'s (month, day) falls
/// before `birth`'s. Someone born on 29 February therefore turns a year older
/// on 1 March in non-leap years. Negative for future birth dates.
pub fn age_on(birth: NaiveDate, reference: NaiveDate) -> i32 {
    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Check that a person born on `birth` is at least `min_years` old on `reference`.
///
/// # Errors
///
/// - [`Rejection::FutureDate`] if `birth` is after `reference`, whatever the
///   computed age.
/// - [`Rejection::BelowMinimumAge`] if the age is below `min_years`.
pub fn check_at_least(
    birth: NaiveDate,
    reference: NaiveDate,
    min_years: u32,
) -> Result<(), Rejection> {
    if birth > reference {
        return Err(Rejection::FutureDate);
    }
    // Not negative here: birth <= reference.
    let age = age_on(birth, reference).unsigned_abs();
    if age < min_years {
        return Err(Rejection::BelowMinimumAge);
    }
    Ok(())
}

/// Boolean form of [`check_at_least`].
pub fn at_least(birth: NaiveDate, reference: NaiveDate, min_years: u32) -> bool {
    check_at_least(birth, reference, min_years).is_ok()
}

/// Parse a `YYYY-MM-DD` birth date.
///
/// # Errors
///
/// [`Rejection::MalformedDate`] for anything that is not a real calendar date.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, Rejection> {
    NaiveDate::parse_from_str(raw.trim(), BIRTH_DATE_FORMAT).map_err(|_| Rejection::MalformedDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_before_and_after_birthday() {
        let birth = date(2000, 6, 15);
        assert_eq!(age_on(birth, date(2026, 6, 14)), 25);
        assert_eq!(age_on(birth, date(2026, 6, 15)), 26);
        assert_eq!(age_on(birth, date(2026, 12, 31)), 26);
    }

    #[test]
    fn exact_boundary_is_eligible() {
        assert!(at_least(date(2008, 10, 19), date(2026, 10, 19), 18));
    }

    #[test]
    fn one_day_short_is_not_eligible() {
        assert_eq!(
            check_at_least(date(2008, 10, 20), date(2026, 10, 19), 18),
            Err(Rejection::BelowMinimumAge)
        );
    }

    #[test]
    fn future_birth_date_rejected_regardless_of_threshold() {
        let reference = date(2026, 10, 19);
        assert_eq!(
            check_at_least(date(2026, 10, 20), reference, 0),
            Err(Rejection::FutureDate)
        );
    }

    #[test]
    fn born_today_meets_zero_threshold() {
        let today = date(2026, 10, 19);
        assert!(at_least(today, today, 0));
        assert!(!at_least(today, today, 1));
    }

    #[test]
    fn leap_day_birthday() {
        let birth = date(2008, 2, 29);
        assert_eq!(age_on(birth, date(2026, 2, 28)), 17);
        assert_eq!(age_on(birth, date(2026, 3, 1)), 18);
        assert!(at_least(birth, date(2028, 2, 29), 20));
    }

    #[test]
    fn parse_accepts_iso_dates() {
        assert_eq!(parse_birth_date("1990-01-31"), Ok(date(1990, 1, 31)));
        assert_eq!(parse_birth_date(" 1990-01-31 "), Ok(date(1990, 1, 31)));
    }

    #[test]
    fn parse_rejects_impossible_and_malformed_dates() {
        assert_eq!(parse_birth_date("1990-02-30"), Err(Rejection::MalformedDate));
        assert_eq!(parse_birth_date("31/01/1990"), Err(Rejection::MalformedDate));
        assert_eq!(parse_birth_date(""), Err(Rejection::MalformedDate));
    }
}
