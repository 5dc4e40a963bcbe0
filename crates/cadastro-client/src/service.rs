//! # Registration Workflow
//!
//! [`RegistrationService`] composes the pure form validation in
//! `cadastro-core` with the two collaborators:
//!
//! ```text
//! autofill_address:  CEP valid? ──> PostalLookup::lookup ──> merge into form
//! check_national_id: check digits ──> RegistrationStore::national_id_exists
//! submit:            validate ──> national_id_exists ──> into_record ──> save
//! ```
//!
//! Every step short-circuits: an invalid value never reaches the network and
//! a duplicate CPF is never sent to `save`.

use cadastro_core::{NationalId, PostalCode, RegistrationForm, RegistrationRecord};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::adapter::{PostalLookup, RegistrationStore};
use crate::error::{ClientError, SaveError, SubmitError};

/// Outcome of checking a CPF before leaving the national-ID step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NationalIdCheck {
    /// The check digits do not match. No request was sent.
    Invalid,
    /// A record with this CPF already exists.
    AlreadyRegistered(NationalId),
    /// The CPF is valid and free.
    Available(NationalId),
}

impl NationalIdCheck {
    /// Whether the form may advance past the national-ID step.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Registration workflow over a postal lookup and a record store.
#[derive(Debug, Clone)]
pub struct RegistrationService<P, S> {
    postal: P,
    store: S,
}

impl<P: PostalLookup, S: RegistrationStore> RegistrationService<P, S> {
    pub fn new(postal: P, store: S) -> Self {
        Self { postal, store }
    }

    pub fn postal(&self) -> &P {
        &self.postal
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fill the form address from its CEP.
    ///
    /// Returns `Ok(true)` when an address was found and merged. An invalid
    /// CEP returns `Ok(false)` without a lookup.
    pub async fn autofill_address(&self, form: &mut RegistrationForm) -> Result<bool, ClientError> {
        let Ok(postal_code) = PostalCode::new(form.postal_code.as_str()) else {
            return Ok(false);
        };
        match self.postal.lookup(&postal_code).await? {
            Some(found) => {
                form.apply_postal_lookup(&found);
                tracing::debug!(cep = %postal_code, "address filled from postal lookup");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Validate `raw` and check it against the store.
    pub async fn check_national_id(&self, raw: &str) -> Result<NationalIdCheck, ClientError> {
        let Ok(national_id) = NationalId::new(raw) else {
            return Ok(NationalIdCheck::Invalid);
        };
        if self.store.national_id_exists(&national_id).await? {
            Ok(NationalIdCheck::AlreadyRegistered(national_id))
        } else {
            Ok(NationalIdCheck::Available(national_id))
        }
    }

    /// Validate, check uniqueness, and persist a completed form.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Invalid`] with every blocking field error. Nothing
    ///   is sent.
    /// - [`SaveError::DuplicateNationalId`] when the CPF is already stored,
    ///   whether found by the uniqueness check or reported by the insert.
    /// - Any other [`SaveError`] from the store.
    pub async fn submit(
        &self,
        form: &RegistrationForm,
        user_id: Uuid,
        registered_at: DateTime<Utc>,
    ) -> Result<RegistrationRecord, SubmitError> {
        let validated = form.validate().map_err(SubmitError::Invalid)?;

        if self.store.national_id_exists(&validated.national_id).await? {
            tracing::info!(
                cpf = %validated.national_id.masked(),
                "registration refused: CPF already registered"
            );
            return Err(SaveError::DuplicateNationalId.into());
        }

        let record = validated.into_record(user_id, registered_at);
        Ok(self.store.save(&record).await?)
    }
}
