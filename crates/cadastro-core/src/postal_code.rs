//! # Postal Code (CEP)
//!
//! An 8-digit code with no checksum, rendered `00000-000`. A valid CEP is
//! the key for the address lookup collaborator.

use serde::{Deserialize, Serialize};

use crate::digits::{normalize_digits, truncated_digits};
use crate::error::ValidationError;

/// Number of digits in a CEP.
pub const POSTAL_CODE_LEN: usize = 8;

/// Longest formatted CEP: `00000-000`.
pub const POSTAL_CODE_FORMATTED_MAX_LEN: usize = 9;

/// Whether `raw` normalizes to exactly 8 digits.
pub fn is_valid_postal_code(raw: &str) -> bool {
    normalize_digits(raw).len() == POSTAL_CODE_LEN
}

/// Render `raw` as `00000-000`. The hyphen appears only once a sixth digit
/// is present; digits beyond the 8th are dropped.
pub fn format_postal_code(raw: &str) -> String {
    let digits = truncated_digits(raw, POSTAL_CODE_LEN);
    if digits.len() <= 5 {
        return digits;
    }
    format!("{}-{}", &digits[..5], &digits[5..])
}

/// A CEP with exactly 8 digits, stored without punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostalCode(String);

impl_validating_deserialize!(PostalCode);

impl PostalCode {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPostalCode`] when `value` does not
    /// contain exactly 8 digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if !is_valid_postal_code(&raw) {
            return Err(ValidationError::InvalidPostalCode(raw));
        }
        Ok(Self(normalize_digits(&raw)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The CEP as `00000-000`.
    pub fn formatted(&self) -> String {
        format_postal_code(&self.0)
    }
}

impl std::fmt::Display for PostalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for PostalCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
