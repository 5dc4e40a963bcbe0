//! # Error Types
//!
//! Two error concepts live in the core:
//!
//! - [`ValidationError`] is returned by the validated identifier constructors
//!   ([`NationalId`](crate::NationalId), [`PostalCode`](crate::PostalCode),
//!   [`PhoneNumber`](crate::PhoneNumber)) and names the rejected input.
//! - [`FieldError`] / [`FieldErrors`] describe why a form field blocks a step
//!   or a submission. The set of fields that can carry an error is closed
//!   ([`FormField`]), so callers cannot attach a message to a field that
//!   does not exist.
//!
//! The plain validators (`is_valid_*`) never produce errors; they return
//! `false`.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::form::FormField;

/// Rejection of a raw value by a validated identifier constructor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// National ID is not 11 digits, is a repeated-digit sequence, or its
    /// check digits do not match.
    #[error("invalid CPF: \"{0}\" (expected 11 digits with valid check digits)")]
    InvalidNationalId(String),

    /// Postal code does not contain exactly 8 digits.
    #[error("invalid CEP: \"{0}\" (expected 8 digits)")]
    InvalidPostalCode(String),

    /// Phone number does not contain 10 or 11 digits.
    #[error("invalid phone number: \"{0}\" (expected 10 or 11 digits including area code)")]
    InvalidPhone(String),
}

/// Why a single form field is not acceptable yet.
///
/// `Display` renders the message shown next to the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldError {
    #[error("Nome completo é obrigatório")]
    NameRequired,

    #[error("CPF inválido")]
    InvalidNationalId,

    #[error("Telefone deve conter 10 ou 11 dígitos")]
    InvalidPhone,

    #[error("CEP deve conter 8 dígitos")]
    InvalidPostalCode,

    /// A free-text field was left blank.
    #[error("Campo obrigatório")]
    Required,

    /// A closed-choice field has no selection.
    #[error("Selecione uma opção")]
    SelectOption,

    /// "Has children" was answered yes without a count of at least one.
    #[error("Informe a quantidade de filhos")]
    ChildrenCountRequired,
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Mapping from form fields to at most one error each.
///
/// Ordered by [`FormField`] declaration order, so rendering and serialized
/// output follow the form layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, FieldError>);

impl FieldErrors {
    /// An empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`, replacing any previous one.
    pub fn insert(&mut self, field: FormField, error: FieldError) {
        self.0.insert(field, error);
    }

    /// The error currently attached to `field`, if any.
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// Remove the error attached to `field`. Called when the user edits it.
    pub fn clear(&mut self, field: FormField) -> Option<FieldError> {
        self.0.remove(&field)
    }

    /// Merge another map into this one. Entries from `other` win.
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(field, error)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    /// `Ok(())` when no field carries an error, otherwise the map itself.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl FromIterator<(FormField, FieldError)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (FormField, FieldError)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field.key(), error)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
