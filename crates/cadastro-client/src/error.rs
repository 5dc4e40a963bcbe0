//! Error types for the registration collaborators.
//!
//! - [`ClientError`]: transport, status, and decoding failures of a single
//!   HTTP call, plus configuration and input rejections.
//! - [`SaveError`]: outcome of persisting a record, with the database
//!   constraint violations the form layer reports to the user.
//! - [`SubmitError`]: outcome of the full registration workflow.

use cadastro_core::{FieldErrors, ValidationError};

use crate::config::ConfigError;

/// Errors from a collaborator HTTP call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The service returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The input was rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

/// Why a record was not persisted.
///
/// The constraint variants carry the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Unique constraint on the CPF column (`23505` on `cadastro_inicial_cpf_key`).
    #[error("Este CPF já foi cadastrado anteriormente. Cada CPF pode ser registrado apenas uma vez.")]
    DuplicateNationalId,
    /// Not-null constraint (`23502`).
    #[error("Alguns campos obrigatórios não foram preenchidos corretamente.")]
    MissingRequiredField,
    /// Any other error reported by the database.
    #[error("{message}")]
    Rejected {
        /// Postgres error code, when reported.
        code: Option<String>,
        message: String,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Why a registration was not completed.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The form has fields that block submission. Nothing was sent.
    #[error("form has invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Save(#[from] SaveError),
}

impl From<ClientError> for SubmitError {
    fn from(err: ClientError) -> Self {
        Self::Save(SaveError::Client(err))
    }
}
