//! # Digit Normalization
//!
//! The first step of every validator and formatter: keep the decimal digits
//! of a raw value, in order, and drop everything else (dots, dashes,
//! parentheses, spaces, letters). Only ASCII `0`-`9` count as digits;
//! other Unicode numerals are dropped like any other punctuation.

/// Return the ordered subsequence of ASCII decimal digits in `raw`.
///
/// Total: any input, including the empty string, yields a (possibly empty)
/// digit string.
pub fn normalize_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize and keep at most `max` digits.
pub(crate) fn truncated_digits(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Numeric value of each digit in a normalized digit string.
pub(crate) fn digit_values(digits: &str) -> Vec<u32> {
    digits.chars().filter_map(|c| c.to_digit(10)).collect()
}
