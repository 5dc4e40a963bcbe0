//! # Validated Registration and Persisted Record
//!
//! [`RegistrationForm::validate`] turns raw form values into a
//! [`ValidatedRegistration`] whose identifiers are typed newtypes. That value
//! maps onto one row of the `cadastro_inicial` table ([`RegistrationRecord`]).
//!
//! The row identifier and timestamp are arguments of
//! [`ValidatedRegistration::into_record`]; the core reads no clock and
//! generates no randomness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FieldError, FieldErrors};
use crate::form::{Address, FormField, MaritalStatus, RegistrationForm, Sex};
use crate::national_id::NationalId;
use crate::phone::PhoneNumber;
use crate::postal_code::PostalCode;

/// A registration whose every field passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    /// Full name, surrounding whitespace trimmed.
    pub full_name: String,
    pub national_id: NationalId,
    pub phone: PhoneNumber,
    pub postal_code: PostalCode,
    pub address: Address,
    pub marital_status: MaritalStatus,
    /// Number of children; 0 when the user has none.
    pub children_count: u32,
    pub sex: Sex,
}

fn single(field: FormField, error: FieldError) -> FieldErrors {
    std::iter::once((field, error)).collect()
}

impl RegistrationForm {
    /// Validate every step and produce the typed registration.
    ///
    /// # Errors
    ///
    /// Returns every field error found across all steps.
    pub fn validate(&self) -> Result<ValidatedRegistration, FieldErrors> {
        self.validate_all().into_result()?;

        let national_id = NationalId::new(self.national_id.as_str())
            .map_err(|_| single(FormField::NationalId, FieldError::InvalidNationalId))?;
        let phone = PhoneNumber::new(self.phone.as_str())
            .map_err(|_| single(FormField::Phone, FieldError::InvalidPhone))?;
        let postal_code = PostalCode::new(self.postal_code.as_str())
            .map_err(|_| single(FormField::PostalCode, FieldError::InvalidPostalCode))?;
        let marital_status = self
            .marital_status
            .ok_or_else(|| single(FormField::MaritalStatus, FieldError::SelectOption))?;
        let sex = self
            .sex
            .ok_or_else(|| single(FormField::Sex, FieldError::SelectOption))?;

        let address = Address {
            street: self.address.street.trim().to_string(),
            number: self.address.number.trim().to_string(),
            complement: self.address.complement.trim().to_string(),
            neighborhood: self.address.neighborhood.trim().to_string(),
            city: self.address.city.trim().to_string(),
            state: self.address.state.trim().to_string(),
        };

        Ok(ValidatedRegistration {
            full_name: self.full_name.trim().to_string(),
            national_id,
            phone,
            postal_code,
            address,
            marital_status,
            children_count: self.resolved_children_count(),
            sex,
        })
    }
}

impl ValidatedRegistration {
    /// Build the row to insert, stamped with `user_id` and `registered_at`.
    pub fn into_record(self, user_id: Uuid, registered_at: DateTime<Utc>) -> RegistrationRecord {
        let complement = self.address.complement_opt().map(str::to_string);
        RegistrationRecord {
            row_id: None,
            user_id,
            registered_at,
            full_name: self.full_name,
            national_id: self.national_id,
            phone: self.phone,
            postal_code: self.postal_code,
            street: self.address.street,
            number: self.address.number,
            complement,
            neighborhood: self.address.neighborhood,
            city: self.address.city,
            state: self.address.state,
            marital_status: self.marital_status,
            children_count: self.children_count,
            sex: self.sex,
        }
    }
}

/// One row of `cadastro_inicial`, serialized with the table's column names.
///
/// Identifiers serialize as bare digits. `sexo` uses the storage spelling
/// (see [`Sex::storage_value`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Database-assigned row number; absent until the row is stored.
    #[serde(rename = "id_linha", default, skip_serializing_if = "Option::is_none")]
    pub row_id: Option<i64>,
    #[serde(rename = "uuid_usuario")]
    pub user_id: Uuid,
    #[serde(rename = "timestamp_cadastro")]
    pub registered_at: DateTime<Utc>,
    #[serde(rename = "nome_completo")]
    pub full_name: String,
    #[serde(rename = "cpf")]
    pub national_id: NationalId,
    #[serde(rename = "telefone")]
    pub phone: PhoneNumber,
    #[serde(rename = "cep")]
    pub postal_code: PostalCode,
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "localidade")]
    pub city: String,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "estado_civil")]
    pub marital_status: MaritalStatus,
    #[serde(rename = "qtd_filhos")]
    pub children_count: u32,
    #[serde(rename = "sexo", with = "sex_column")]
    pub sex: Sex,
}

mod sex_column {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::form::Sex;

    pub fn serialize<S: Serializer>(sex: &Sex, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(sex.storage_value())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Sex, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Sex::from_storage_value(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown sexo value: {raw}")))
    }
}
