//! Validation entry points for the transport layer.
//!
//! Each entry point takes the raw string a user submitted plus the declared
//! context, and returns an accept/reject [`Verdict`] with a human-readable reason.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{age, card, routing, CardBrand, Rejection};

/// What kind of identifier a submitted number claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationContext {
    /// A payment card number (Luhn + brand).
    Card,
    /// A bank transfer, identified by its ABA routing number.
    BankTransfer,
}

/// Outcome of validating one submitted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Why the value was rejected; `None` when accepted.
    pub rejection: Option<Rejection>,
    /// Detected card brand, for accepted card numbers only.
    pub brand: Option<CardBrand>,
}

impl Verdict {
    fn accept(brand: Option<CardBrand>) -> Self {
        Self {
            rejection: None,
            brand,
        }
    }

    fn reject(rejection: Rejection) -> Self {
        Self {
            rejection: Some(rejection),
            brand: None,
        }
    }

    /// `true` if the value passed every check.
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }

    /// Machine-readable reason code, if rejected.
    pub fn code(&self) -> Option<&'static str> {
        self.rejection.as_ref().map(Rejection::code)
    }

    /// Human-readable reason suitable for showing to the user.
    pub fn reason(&self) -> String {
        match (&self.rejection, &self.brand) {
            (Some(r), _) => r.to_string(),
            (None, Some(brand)) => format!("valid {} card number", brand.name()),
            (None, None) => "valid".to_owned(),
        }
    }
}

impl From<Result<Option<CardBrand>, Rejection>> for Verdict {
    fn from(result: Result<Option<CardBrand>, Rejection>) -> Self {
        match result {
            Ok(brand) => Verdict::accept(brand),
            Err(r) => Verdict::reject(r),
        }
    }
}

/// Validate a submitted card or routing number.
///
/// Spaces and dashes between digit groups are stripped first; every other
/// character is judged as typed.
pub fn validate(context: ValidationContext, raw: &str) -> Verdict {
    let digits = card::normalize(raw);
    match context {
        ValidationContext::Card => card::validate(&digits).map(Some).into(),
        ValidationContext::BankTransfer => {
            routing::check(&digits).map(|()| None::<CardBrand>).into()
        }
    }
}

/// Validate a submitted `YYYY-MM-DD` birth date against a minimum age on `reference`.
pub fn validate_birth_date(raw: &str, reference: NaiveDate, min_years: u32) -> Verdict {
    age::parse_birth_date(raw)
        .and_then(|birth| age::check_at_least(birth, reference, min_years))
        .map(|()| None::<CardBrand>)
        .into()
}
