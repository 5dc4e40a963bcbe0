//! # Validation Engine Properties
//!
//! Exercises the public validators and formatters through the crate root,
//! the way the form layer calls them:
//!
//! 1. **Reference vectors**: known CPF, CEP, phone, and name inputs with their
//!    expected validity and formatted output.
//!
//! 2. **Property tests**: for arbitrary text, normalization keeps only digits
//!    in order, every formatter is idempotent and bounded in length, and the
//!    validity of a value never depends on its punctuation.

use cadastro_core::{
    format_national_id, format_phone, format_postal_code, is_valid_name, is_valid_national_id,
    is_valid_phone, is_valid_postal_code, normalize_digits, NationalId, PhoneNumber, PostalCode,
};
use proptest::prelude::*;

// ── Reference vectors ────────────────────────────────────────────────

#[test]
fn national_id_reference_vectors() {
    assert!(is_valid_national_id("11144477735"));
    assert!(!is_valid_national_id("11144477736"));
    assert!(!is_valid_national_id("11111111111"));
    assert_eq!(format_national_id("11144477735"), "111.444.777-35");
    assert_eq!(format_national_id("111444777"), "111.444.777");
}

#[test]
fn postal_code_reference_vectors() {
    assert!(is_valid_postal_code("01310930"));
    assert!(!is_valid_postal_code("0131093"));
    assert_eq!(format_postal_code("01310930"), "01310-930");
}

#[test]
fn phone_reference_vectors() {
    assert!(is_valid_phone("11987654321"));
    assert!(is_valid_phone("1198765432"));
    assert!(!is_valid_phone("119876543"));
    assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
    assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
}

#[test]
fn name_reference_vectors() {
    assert!(!is_valid_name(" a "));
    assert!(is_valid_name("Jo"));
}

#[test]
fn formatted_values_stay_valid() {
    assert!(is_valid_national_id(&format_national_id("11144477735")));
    assert!(is_valid_postal_code(&format_postal_code("01310930")));
    assert!(is_valid_phone(&format_phone("11987654321")));
}

// ── Strategies ───────────────────────────────────────────────────────

/// Digits interleaved with the punctuation users actually type.
fn punctuated_digits(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => "[0-9]",
            1 => "[.\\-() /]",
        ],
        0..max,
    )
    .prop_map(|parts| parts.concat())
}

/// Eleven digits whose last two are valid CPF check digits.
fn valid_cpf_digits() -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..10, 9)
        .prop_filter("repeated-digit base", |base| {
            base.iter().any(|d| *d != base[0])
        })
        .prop_map(|base| {
            let check = |digits: &[u32]| {
                let n = digits.len() as u32;
                let sum: u32 = digits
                    .iter()
                    .enumerate()
                    .map(|(i, d)| d * (n + 1 - i as u32))
                    .sum();
                let c = 11 - sum % 11;
                if c < 10 {
                    c
                } else {
                    0
                }
            };
            let mut digits = base;
            let d1 = check(&digits);
            digits.push(d1);
            let d2 = check(&digits);
            digits.push(d2);
            digits.iter().map(|d| d.to_string()).collect()
        })
}

// ── Properties ───────────────────────────────────────────────────────

proptest! {
    /// Normalization keeps exactly the ASCII digits, in their original order.
    #[test]
    fn normalize_keeps_digits_in_order(text in any::<String>()) {
        let digits = normalize_digits(&text);
        prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
        let expected: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(digits, expected);
    }

    /// Every formatter is idempotent on arbitrary text.
    #[test]
    fn formatters_are_idempotent(text in any::<String>()) {
        let cpf = format_national_id(&text);
        prop_assert_eq!(format_national_id(&cpf), cpf.clone());
        let cep = format_postal_code(&text);
        prop_assert_eq!(format_postal_code(&cep), cep.clone());
        let phone = format_phone(&text);
        prop_assert_eq!(format_phone(&phone), phone.clone());
    }

    /// Formatted output never exceeds the template length.
    #[test]
    fn formatters_respect_template_length(text in punctuated_digits(40)) {
        prop_assert!(format_national_id(&text).len() <= 14);
        prop_assert!(format_postal_code(&text).len() <= 9);
        prop_assert!(format_phone(&text).len() <= 15);
    }

    /// Formatting never invents or reorders digits within the template's capacity.
    #[test]
    fn formatters_preserve_digit_prefix(text in punctuated_digits(40)) {
        let digits = normalize_digits(&text);
        let take = |n: usize| digits.chars().take(n).collect::<String>();
        prop_assert_eq!(normalize_digits(&format_national_id(&text)), take(11));
        prop_assert_eq!(normalize_digits(&format_postal_code(&text)), take(8));
        prop_assert_eq!(normalize_digits(&format_phone(&text)), take(11));
    }

    /// Validity depends on the digits only, never on punctuation.
    #[test]
    fn validity_ignores_punctuation(text in punctuated_digits(20)) {
        let digits = normalize_digits(&text);
        prop_assert_eq!(is_valid_national_id(&text), is_valid_national_id(&digits));
        prop_assert_eq!(is_valid_postal_code(&text), is_valid_postal_code(&digits));
        prop_assert_eq!(is_valid_phone(&text), is_valid_phone(&digits));
    }

    /// Any length other than 11 is never a valid CPF.
    #[test]
    fn wrong_length_cpf_is_invalid(digits in "[0-9]{0,10}|[0-9]{12,20}") {
        prop_assert!(!is_valid_national_id(&digits));
    }

    /// Independently computed check digits are always accepted, and changing
    /// the last digit is always rejected.
    #[test]
    fn generated_cpfs_validate(cpf in valid_cpf_digits()) {
        prop_assert!(is_valid_national_id(&cpf));
        prop_assert!(is_valid_national_id(&format_national_id(&cpf)));

        let last = cpf.chars().last().and_then(|c| c.to_digit(10)).unwrap_or(0);
        let mut tampered = cpf[..10].to_string();
        tampered.push(char::from_digit((last + 1) % 10, 10).unwrap_or('0'));
        prop_assert!(!is_valid_national_id(&tampered));
    }

    /// The newtypes accept exactly what the validators accept.
    #[test]
    fn newtypes_agree_with_validators(text in punctuated_digits(20)) {
        prop_assert_eq!(NationalId::new(text.clone()).is_ok(), is_valid_national_id(&text));
        prop_assert_eq!(PostalCode::new(text.clone()).is_ok(), is_valid_postal_code(&text));
        prop_assert_eq!(PhoneNumber::new(text.clone()).is_ok(), is_valid_phone(&text));
    }

    /// Names: validity is the trimmed character count.
    #[test]
    fn name_validity_is_trimmed_length(name in any::<String>()) {
        prop_assert_eq!(is_valid_name(&name), name.trim().chars().count() >= 2);
    }
}
