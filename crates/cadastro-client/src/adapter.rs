//! # Collaborator Traits
//!
//! The registration workflow talks to two external services:
//!
//! - **Postal lookup**: resolves a CEP to a street address.
//! - **Registration store**: answers whether a CPF is already registered and
//!   persists new records.
//!
//! [`RegistrationService`](crate::RegistrationService) is generic over these
//! traits. The HTTP clients ([`PostalClient`](crate::PostalClient),
//! [`RegistryClient`](crate::RegistryClient)) are the production
//! implementations; tests substitute in-memory doubles.
//!
//! Implementations must be `Send + Sync` so a service can be shared across
//! tasks, and their futures must be `Send` so they can be spawned on a
//! multi-threaded runtime.

use std::future::Future;

use cadastro_core::{Address, NationalId, PostalCode, RegistrationRecord};

use crate::error::{ClientError, SaveError};

/// Address lookup by postal code.
pub trait PostalLookup: Send + Sync {
    /// Resolve `postal_code` to an address.
    ///
    /// Returns `Ok(None)` when the service does not know the code. The
    /// returned address never carries a house number.
    fn lookup(
        &self,
        postal_code: &PostalCode,
    ) -> impl Future<Output = Result<Option<Address>, ClientError>> + Send;
}

/// Remote store of registration records.
pub trait RegistrationStore: Send + Sync {
    /// Whether a record with this CPF already exists.
    fn national_id_exists(
        &self,
        national_id: &NationalId,
    ) -> impl Future<Output = Result<bool, ClientError>> + Send;

    /// Persist `record` and return the row as stored.
    fn save(
        &self,
        record: &RegistrationRecord,
    ) -> impl Future<Output = Result<RegistrationRecord, SaveError>> + Send;
}
