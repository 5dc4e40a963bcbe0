//! # Registration Form Model
//!
//! The raw values of an in-progress registration, the closed set of fields
//! that can carry an error, and the ordered steps of the multi-step flow.
//!
//! ## Step Gating
//!
//! | Step | Fields checked | Failure |
//! |------|----------------|---------|
//! | `FullName` | full name | `NameRequired` |
//! | `NationalId` | CPF | `InvalidNationalId` |
//! | `Phone` | phone | `InvalidPhone` |
//! | `Address` | CEP, street, number, neighborhood, city, state | `InvalidPostalCode` / `Required` |
//! | `MaritalStatus` | marital status | `SelectOption` |
//! | `Children` | has children, children count | `SelectOption` / `ChildrenCountRequired` |
//! | `Sex` | sex | `SelectOption` |
//! | `Review` | none | |
//!
//! The single-page form runs every step's checks at once
//! ([`RegistrationForm::validate_all`]).
//!
//! Nothing here holds state between calls: the orchestration layer owns the
//! form value and passes it in by reference.

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldErrors};
use crate::name::is_valid_name;
use crate::national_id::{format_national_id, is_valid_national_id};
use crate::phone::{format_phone, is_valid_phone};
use crate::postal_code::{format_postal_code, is_valid_postal_code};

// -- Closed choices -----------------------------------------------------------

/// Marital status, serialized with the database values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Solteiro,
    Casado,
    Divorciado,
    Viuvo,
    UniaoEstavel,
}

impl MaritalStatus {
    pub const ALL: [MaritalStatus; 5] = [
        Self::Solteiro,
        Self::Casado,
        Self::Divorciado,
        Self::Viuvo,
        Self::UniaoEstavel,
    ];

    /// Label shown on the option.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Solteiro => "Solteiro(a)",
            Self::Casado => "Casado(a)",
            Self::Divorciado => "Divorciado(a)",
            Self::Viuvo => "Viúvo(a)",
            Self::UniaoEstavel => "União Estável",
        }
    }
}

/// Declared sex.
///
/// The form value and the stored value differ for one variant:
/// `PREFIRO_NAO_DECLARAR` is stored as `PREFIRO NÃO DECLARAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Masculino,
    Feminino,
    PrefiroNaoDeclarar,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Self::Masculino, Self::Feminino, Self::PrefiroNaoDeclarar];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Masculino => "Masculino",
            Self::Feminino => "Feminino",
            Self::PrefiroNaoDeclarar => "Prefiro não declarar",
        }
    }

    /// Value written to the `sexo` column.
    pub fn storage_value(&self) -> &'static str {
        match self {
            Self::Masculino => "MASCULINO",
            Self::Feminino => "FEMININO",
            Self::PrefiroNaoDeclarar => "PREFIRO NÃO DECLARAR",
        }
    }

    /// Inverse of [`Sex::storage_value`]. Also accepts the form spelling.
    pub fn from_storage_value(value: &str) -> Option<Self> {
        match value {
            "MASCULINO" => Some(Self::Masculino),
            "FEMININO" => Some(Self::Feminino),
            "PREFIRO NÃO DECLARAR" | "PREFIRO_NAO_DECLARAR" => Some(Self::PrefiroNaoDeclarar),
            _ => None,
        }
    }
}

// -- Address ------------------------------------------------------------------

/// Street address. Either typed by the user or filled from a postal lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state abbreviation (UF).
    pub state: String,
}

impl Address {
    /// Fill the address from a postal lookup result.
    ///
    /// Street, neighborhood, city and state are replaced. The house number is
    /// never part of a lookup and is kept. The complement is only taken from
    /// the lookup when the user has not typed one.
    pub fn merge_lookup(&mut self, found: &Address) {
        self.street = found.street.clone();
        self.neighborhood = found.neighborhood.clone();
        self.city = found.city.clone();
        self.state = found.state.clone();
        if self.complement.trim().is_empty() {
            self.complement = found.complement.clone();
        }
    }

    /// The complement, or `None` when blank.
    pub fn complement_opt(&self) -> Option<&str> {
        let trimmed = self.complement.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

// -- Fields and steps ---------------------------------------------------------

/// Every form field that can carry an error.
///
/// Declaration order is form order; [`FieldErrors`] iterates in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    FullName,
    NationalId,
    Phone,
    PostalCode,
    Street,
    Number,
    Neighborhood,
    City,
    State,
    MaritalStatus,
    HasChildren,
    ChildrenCount,
    Sex,
}

impl FormField {
    pub const ALL: [FormField; 13] = [
        Self::FullName,
        Self::NationalId,
        Self::Phone,
        Self::PostalCode,
        Self::Street,
        Self::Number,
        Self::Neighborhood,
        Self::City,
        Self::State,
        Self::MaritalStatus,
        Self::HasChildren,
        Self::ChildrenCount,
        Self::Sex,
    ];

    /// Stable snake_case key, matching the serialized form.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FullName => "full_name",
            Self::NationalId => "national_id",
            Self::Phone => "phone",
            Self::PostalCode => "postal_code",
            Self::Street => "street",
            Self::Number => "number",
            Self::Neighborhood => "neighborhood",
            Self::City => "city",
            Self::State => "state",
            Self::MaritalStatus => "marital_status",
            Self::HasChildren => "has_children",
            Self::ChildrenCount => "children_count",
            Self::Sex => "sex",
        }
    }

    /// The step that gates this field.
    pub fn step(&self) -> FormStep {
        match self {
            Self::FullName => FormStep::FullName,
            Self::NationalId => FormStep::NationalId,
            Self::Phone => FormStep::Phone,
            Self::PostalCode
            | Self::Street
            | Self::Number
            | Self::Neighborhood
            | Self::City
            | Self::State => FormStep::Address,
            Self::MaritalStatus => FormStep::MaritalStatus,
            Self::HasChildren | Self::ChildrenCount => FormStep::Children,
            Self::Sex => FormStep::Sex,
        }
    }

    /// Apply the field's input mask to a freshly typed value.
    ///
    /// CPF, CEP and phone are re-punctuated; every other field is returned
    /// unchanged.
    pub fn format(&self, raw: &str) -> String {
        match self {
            Self::NationalId => format_national_id(raw),
            Self::PostalCode => format_postal_code(raw),
            Self::Phone => format_phone(raw),
            _ => raw.to_string(),
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Steps of the multi-step flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    FullName,
    NationalId,
    Phone,
    Address,
    MaritalStatus,
    Children,
    Sex,
    Review,
}

impl FormStep {
    pub const ALL: [FormStep; 8] = [
        Self::FullName,
        Self::NationalId,
        Self::Phone,
        Self::Address,
        Self::MaritalStatus,
        Self::Children,
        Self::Sex,
        Self::Review,
    ];

    /// Total number of steps, review included.
    pub const COUNT: usize = Self::ALL.len();

    /// 1-based position.
    pub fn number(&self) -> usize {
        *self as usize + 1
    }

    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    /// Completion shown on the progress bar, rounded half up.
    pub fn progress_percent(&self) -> u8 {
        let pct = (self.number() * 100 + Self::COUNT / 2) / Self::COUNT;
        pct as u8
    }

    /// Fields this step validates.
    pub fn fields(&self) -> &'static [FormField] {
        match self {
            Self::FullName => &[FormField::FullName],
            Self::NationalId => &[FormField::NationalId],
            Self::Phone => &[FormField::Phone],
            Self::Address => &[
                FormField::PostalCode,
                FormField::Street,
                FormField::Number,
                FormField::Neighborhood,
                FormField::City,
                FormField::State,
            ],
            Self::MaritalStatus => &[FormField::MaritalStatus],
            Self::Children => &[FormField::HasChildren, FormField::ChildrenCount],
            Self::Sex => &[FormField::Sex],
            Self::Review => &[],
        }
    }
}

// -- Form ---------------------------------------------------------------------

/// Raw values of a registration, as typed or selected.
///
/// Text fields hold whatever the user entered, punctuation included.
/// Choice fields are `None` until a selection is made.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub postal_code: String,
    pub address: Address,
    pub marital_status: Option<MaritalStatus>,
    pub has_children: Option<bool>,
    pub children_count: Option<u32>,
    pub sex: Option<Sex>,
}

fn require_text(errors: &mut FieldErrors, field: FormField, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field, FieldError::Required);
    }
}

impl RegistrationForm {
    /// Errors that block leaving `step`. Empty when the step may advance.
    pub fn validate_step(&self, step: FormStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            FormStep::FullName => {
                if !is_valid_name(&self.full_name) {
                    errors.insert(FormField::FullName, FieldError::NameRequired);
                }
            }
            FormStep::NationalId => {
                if !is_valid_national_id(&self.national_id) {
                    errors.insert(FormField::NationalId, FieldError::InvalidNationalId);
                }
            }
            FormStep::Phone => {
                if !is_valid_phone(&self.phone) {
                    errors.insert(FormField::Phone, FieldError::InvalidPhone);
                }
            }
            FormStep::Address => {
                if !is_valid_postal_code(&self.postal_code) {
                    errors.insert(FormField::PostalCode, FieldError::InvalidPostalCode);
                }
                require_text(&mut errors, FormField::Street, &self.address.street);
                require_text(&mut errors, FormField::Number, &self.address.number);
                require_text(&mut errors, FormField::Neighborhood, &self.address.neighborhood);
                require_text(&mut errors, FormField::City, &self.address.city);
                require_text(&mut errors, FormField::State, &self.address.state);
            }
            FormStep::MaritalStatus => {
                if self.marital_status.is_none() {
                    errors.insert(FormField::MaritalStatus, FieldError::SelectOption);
                }
            }
            FormStep::Children => match self.has_children {
                None => errors.insert(FormField::HasChildren, FieldError::SelectOption),
                Some(true) if self.children_count.unwrap_or(0) < 1 => {
                    errors.insert(FormField::ChildrenCount, FieldError::ChildrenCountRequired)
                }
                Some(_) => {}
            },
            FormStep::Sex => {
                if self.sex.is_none() {
                    errors.insert(FormField::Sex, FieldError::SelectOption);
                }
            }
            FormStep::Review => {}
        }
        errors
    }

    /// Errors across every step, as checked by the single-page form.
    pub fn validate_all(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for step in FormStep::ALL {
            errors.extend(self.validate_step(step));
        }
        errors
    }

    /// Children count that will be stored: the entered count when the user
    /// has children, otherwise 0.
    pub fn resolved_children_count(&self) -> u32 {
        match self.has_children {
            Some(true) => self.children_count.unwrap_or(0),
            _ => 0,
        }
    }

    /// Fill the address from a postal lookup, keeping the house number.
    pub fn apply_postal_lookup(&mut self, found: &Address) {
        self.address.merge_lookup(found);
    }
}
