//! Full-name rule: at least two characters once surrounding whitespace is
//! trimmed. No other normalization is applied.
//!
//! Length is counted in Unicode scalar values, not UTF-16 code units, so a
//! single emoji (two UTF-16 units) counts as one character and is rejected.

/// Minimum trimmed length of a full name, in characters.
pub const MIN_NAME_LEN: usize = 2;

/// Whether `raw`, trimmed, has at least [`MIN_NAME_LEN`] characters.
pub fn is_valid_name(raw: &str) -> bool {
    raw.trim().chars().count() >= MIN_NAME_LEN
}
