//! # cadastro-client -- Collaborators of the registration form
//!
//! Typed async clients for the two external services a registration needs,
//! and the workflow that ties them to the validation engine in
//! `cadastro-core`:
//!
//! - **Postal lookup** via a ViaCEP-compatible service ([`PostalClient`]).
//! - **Registration store** via a PostgREST endpoint over the
//!   `cadastro_inicial` table ([`RegistryClient`]): CPF uniqueness check and
//!   insert.
//! - **Workflow** ([`RegistrationService`]): address autofill, CPF gate, and
//!   submission.
//!
//! ## Architecture
//!
//! The service is generic over the [`PostalLookup`] and [`RegistrationStore`]
//! traits, so the workflow is tested against in-memory doubles and the HTTP
//! clients are tested against `wiremock` servers.
//!
//! [`CadastroClient`] shares a single `reqwest::Client` (and its connection
//! pool) between both HTTP clients. The database key is attached per request
//! and never reaches the postal service.
//!
//! No call is retried. Each operation is one request bounded by the
//! configured timeout.

pub mod adapter;
pub mod config;
pub mod error;
pub mod postal;
pub mod registry;
pub mod service;

pub use adapter::{PostalLookup, RegistrationStore};
pub use config::{ClientConfig, ConfigError, PostalConfig, RegistryConfig};
pub use error::{ClientError, SaveError, SubmitError};
pub use postal::PostalClient;
pub use registry::RegistryClient;
pub use service::{NationalIdCheck, RegistrationService};

/// Build the HTTP client shared by the collaborators.
pub(crate) fn build_http() -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .user_agent(concat!("cadastro/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ClientError::Http {
            endpoint: "client_init".into(),
            source: e,
        })
}

/// Top-level client. Holds one sub-client per collaborator.
#[derive(Debug, Clone)]
pub struct CadastroClient {
    postal: PostalClient,
    registry: RegistryClient,
}

impl CadastroClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = build_http()?;
        Ok(Self {
            postal: PostalClient::with_http(http.clone(), &config.postal),
            registry: RegistryClient::with_http(http, &config.registry),
        })
    }

    /// Access the postal lookup client.
    pub fn postal(&self) -> &PostalClient {
        &self.postal
    }

    /// Access the registration table client.
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Registration workflow over this client's collaborators.
    pub fn service(&self) -> RegistrationService<PostalClient, RegistryClient> {
        RegistrationService::new(self.postal.clone(), self.registry.clone())
    }
}
