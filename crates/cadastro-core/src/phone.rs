//! # Phone Number
//!
//! Brazilian numbers carry a 2-digit area code followed by an 8-digit
//! landline or a 9-digit mobile number. Validation is a digit count only:
//! 10 (landline) or 11 (mobile).
//!
//! Formatting follows the count after truncation to 11 digits:
//!
//! | Digits | Template |
//! |--------|----------|
//! | up to 10 | `(00) 0000-0000` |
//! | exactly 11 | `(00) 00000-0000` |
//!
//! Partial input only receives the punctuation its digits reach: `(1`,
//! `(11`, `(11) 3`, `(11) 3456-7`.

use serde::{Deserialize, Serialize};

use crate::digits::{normalize_digits, truncated_digits};
use crate::error::ValidationError;

/// Landline digit count including area code.
pub const LANDLINE_LEN: usize = 10;

/// Mobile digit count including area code.
pub const MOBILE_LEN: usize = 11;

/// Longest formatted phone: `(00) 00000-0000`.
pub const PHONE_FORMATTED_MAX_LEN: usize = 15;

const AREA_CODE_LEN: usize = 2;

/// Whether `raw` normalizes to exactly 10 or 11 digits.
pub fn is_valid_phone(raw: &str) -> bool {
    matches!(normalize_digits(raw).len(), LANDLINE_LEN | MOBILE_LEN)
}

/// Render `raw` as `(00) 0000-0000` or, for exactly 11 digits,
/// `(00) 00000-0000`.
pub fn format_phone(raw: &str) -> String {
    let digits = truncated_digits(raw, MOBILE_LEN);
    let len = digits.len();
    if len == 0 {
        return String::new();
    }

    let mut out = String::with_capacity(PHONE_FORMATTED_MAX_LEN);
    out.push('(');
    if len <= AREA_CODE_LEN {
        out.push_str(&digits);
        return out;
    }
    out.push_str(&digits[..AREA_CODE_LEN]);
    out.push_str(") ");

    // Subscriber block before the hyphen: 5 digits for mobile, else 4.
    let block = if len == MOBILE_LEN { 5 } else { 4 };
    let hyphen_at = AREA_CODE_LEN + block;
    if len <= hyphen_at {
        out.push_str(&digits[AREA_CODE_LEN..]);
    } else {
        out.push_str(&digits[AREA_CODE_LEN..hyphen_at]);
        out.push('-');
        out.push_str(&digits[hyphen_at..]);
    }
    out
}

/// A phone number with area code, 10 or 11 digits, stored without
/// punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PhoneNumber(String);

impl_validating_deserialize!(PhoneNumber);

impl PhoneNumber {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPhone`] when `value` does not contain
    /// 10 or 11 digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if !is_valid_phone(&raw) {
            return Err(ValidationError::InvalidPhone(raw));
        }
        Ok(Self(normalize_digits(&raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-digit area code (DDD).
    pub fn area_code(&self) -> &str {
        &self.0[..AREA_CODE_LEN]
    }

    pub fn is_mobile(&self) -> bool {
        self.0.len() == MOBILE_LEN
    }

    pub fn formatted(&self) -> String {
        format_phone(&self.0)
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
