//! # National ID (CPF)
//!
//! The Brazilian CPF is an 11-digit identifier whose last two digits are
//! check digits computed from the preceding ones with two weighted mod-11
//! sums:
//!
//! | Check digit | Digits summed | Weights |
//! |-------------|---------------|---------|
//! | first (pos 9) | positions 0..=8 | 10 down to 2 |
//! | second (pos 10) | positions 0..=9 | 11 down to 2 |
//!
//! For each sum `r = sum mod 11`, the check digit is `11 - r` when that is
//! below 10 and `0` otherwise. Both `r == 0` (which yields 11) and `r == 1`
//! (which yields 10) therefore map to `0`.
//!
//! The eleven repeated-digit sequences (`00000000000` ... `99999999999`)
//! satisfy the arithmetic but are rejected.

use serde::{Deserialize, Serialize};

use crate::digits::{digit_values, normalize_digits, truncated_digits};
use crate::error::ValidationError;

/// Number of digits in a CPF.
pub const NATIONAL_ID_LEN: usize = 11;

/// Longest formatted CPF: `000.000.000-00`.
pub const NATIONAL_ID_FORMATTED_MAX_LEN: usize = 14;

/// Check digit for a weighted sum: `11 - (sum mod 11)`, wrapped to 0 at 10 or above.
fn check_digit(sum: u32) -> u32 {
    let candidate = 11 - sum % 11;
    if candidate < 10 {
        candidate
    } else {
        0
    }
}

/// Weighted sum of the first `count` digits, weights descending from `count + 1` to 2.
fn weighted_sum(digits: &[u32], count: usize) -> u32 {
    digits[..count]
        .iter()
        .enumerate()
        .map(|(pos, d)| d * (count as u32 + 1 - pos as u32))
        .sum()
}

/// Whether `raw` holds a CPF with correct check digits.
///
/// Punctuation is ignored. Anything that does not normalize to exactly 11
/// digits, and every repeated-digit sequence, is invalid.
pub fn is_valid_national_id(raw: &str) -> bool {
    let digits = digit_values(&normalize_digits(raw));
    if digits.len() != NATIONAL_ID_LEN {
        return false;
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let first = check_digit(weighted_sum(&digits, 9));
    let second = check_digit(weighted_sum(&digits, 10));

    first == digits[9] && second == digits[10]
}

/// Render `raw` as `000.000.000-00`, inserting only the punctuation the
/// available digits reach.
///
/// Digits beyond the 11th are dropped. The output normalizes back to the
/// same digits, so applying the formatter twice changes nothing.
pub fn format_national_id(raw: &str) -> String {
    let digits = truncated_digits(raw, NATIONAL_ID_LEN);
    let mut out = String::with_capacity(NATIONAL_ID_FORMATTED_MAX_LEN);
    for (pos, c) in digits.chars().enumerate() {
        match pos {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// A CPF whose check digits have been verified.
///
/// Stored as the canonical 11-digit string. The constructor accepts both
/// `"11144477735"` and `"111.444.777-35"` (or any other punctuation).
/// Serializes as the bare digits; deserialization revalidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NationalId(String);

impl_validating_deserialize!(NationalId);

impl NationalId {
    /// Validate `value` and store its canonical digits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNationalId`] carrying the raw input
    /// when the check digits do not match or the length is wrong.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if !is_valid_national_id(&raw) {
            return Err(ValidationError::InvalidNationalId(raw));
        }
        Ok(Self(normalize_digits(&raw)))
    }

    /// The canonical 11 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The CPF as `000.000.000-00`.
    pub fn formatted(&self) -> String {
        format_national_id(&self.0)
    }

    /// Form suitable for logs: only the middle six digits are shown
    /// (`***.444.777-**`).
    pub fn masked(&self) -> String {
        format!("***.{}.{}-**", &self.0[3..6], &self.0[6..9])
    }
}

impl std::fmt::Display for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for NationalId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
