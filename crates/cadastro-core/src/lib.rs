//! # cadastro-core -- Field Validation and Formatting Engine
//!
//! Pure functions that turn raw registration input into canonical form and
//! decide whether it is acceptable:
//!
//! | Function | Rule |
//! |----------|------|
//! | [`normalize_digits`] | keep ASCII digits, in order |
//! | [`is_valid_national_id`] / [`format_national_id`] | CPF mod-11 check digits, `000.000.000-00` |
//! | [`is_valid_postal_code`] / [`format_postal_code`] | 8 digits, `00000-000` |
//! | [`is_valid_phone`] / [`format_phone`] | 10 or 11 digits, `(00) 0000-0000` / `(00) 00000-0000` |
//! | [`is_valid_name`] | at least 2 characters after trimming |
//!
//! On top of those sit the validated newtypes ([`NationalId`],
//! [`PostalCode`], [`PhoneNumber`]), the form model with its step gating
//! ([`RegistrationForm`], [`FormStep`], [`FieldErrors`]), and the mapping to
//! the persisted row ([`RegistrationRecord`]).
//!
//! ## Crate Policy
//!
//! - No I/O, no clocks, no randomness, no stored state. Every value is an
//!   explicit argument.
//! - Validators are total: malformed input yields `false` or a shorter
//!   formatted string, never a panic.
//! - No `unsafe` code. No `.unwrap()` outside tests.
//! - No dependencies on other `cadastro-*` crates (this is the leaf).

/// Implement `Deserialize` for a validated string newtype by routing the raw
/// string through its `new()` constructor, so invalid values are rejected at
/// deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod digits;
pub mod error;
pub mod form;
pub mod name;
pub mod national_id;
pub mod phone;
pub mod postal_code;
pub mod record;

pub use digits::normalize_digits;
pub use error::{FieldError, FieldErrors, ValidationError};
pub use form::{Address, FormField, FormStep, MaritalStatus, RegistrationForm, Sex};
pub use name::is_valid_name;
pub use national_id::{format_national_id, is_valid_national_id, NationalId};
pub use phone::{format_phone, is_valid_phone, PhoneNumber};
pub use postal_code::{format_postal_code, is_valid_postal_code, PostalCode};
pub use record::{RegistrationRecord, ValidatedRegistration};
