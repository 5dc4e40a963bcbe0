//! Typed client for the registration table behind a PostgREST endpoint.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/rest/v1/{table}?select=cpf&cpf=eq.{cpf}&limit=1` | Uniqueness check |
//! | POST | `/rest/v1/{table}` | Insert one record |
//!
//! Every request carries the API key twice, as `apikey` and as a bearer
//! token. The key is attached per request rather than as a client default
//! header because the underlying `reqwest::Client` is shared with the postal
//! lookup.
//!
//! ## Insert Error Mapping
//!
//! PostgREST reports constraint violations as a JSON body
//! `{code, message, details, hint}`:
//!
//! | Code | Condition | Result |
//! |------|-----------|--------|
//! | `23505` | message names `cadastro_inicial_cpf_key` | [`SaveError::DuplicateNationalId`] |
//! | `23502` | any | [`SaveError::MissingRequiredField`] |
//! | other | any | [`SaveError::Rejected`] |
//!
//! A non-2xx response whose body is not a PostgREST error stays a
//! [`ClientError::Api`].

use std::time::Duration;

use cadastro_core::{NationalId, RegistrationRecord};
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::adapter::RegistrationStore;
use crate::config::RegistryConfig;
use crate::error::{ClientError, SaveError};

/// Path prefix of the PostgREST API.
const API_PREFIX: &str = "rest/v1";

/// Unique constraint on the CPF column.
const NATIONAL_ID_UNIQUE_CONSTRAINT: &str = "cadastro_inicial_cpf_key";

const UNIQUE_VIOLATION: &str = "23505";
const NOT_NULL_VIOLATION: &str = "23502";

/// Error body returned by PostgREST.
#[derive(Debug, Clone, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl PostgrestError {
    fn into_save_error(self) -> SaveError {
        let message = self.message.unwrap_or_default();
        match self.code.as_deref() {
            Some(UNIQUE_VIOLATION) if message.contains(NATIONAL_ID_UNIQUE_CONSTRAINT) => {
                SaveError::DuplicateNationalId
            }
            Some(NOT_NULL_VIOLATION) => SaveError::MissingRequiredField,
            _ => SaveError::Rejected {
                code: self.code,
                message,
            },
        }
    }
}

/// Client for the registration table.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: Zeroizing<String>,
    table: String,
    timeout: Duration,
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RegistryClient {
    /// Create a standalone client with its own connection pool.
    pub fn new(config: &RegistryConfig) -> Result<Self, ClientError> {
        Ok(Self::with_http(crate::build_http()?, config))
    }

    pub(crate) fn with_http(http: reqwest::Client, config: &RegistryConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            table: config.table.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    fn table_url(&self) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, self.table)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .timeout(self.timeout)
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
    }

    /// Whether a record with `national_id` already exists.
    ///
    /// Calls `GET {base_url}/rest/v1/{table}?select=cpf&cpf=eq.{digits}&limit=1`.
    pub async fn national_id_exists(&self, national_id: &NationalId) -> Result<bool, ClientError> {
        let endpoint = format!("GET /{API_PREFIX}/{}", self.table);
        let filter = format!("eq.{}", national_id.as_str());

        let resp = self
            .authorized(self.http.get(self.table_url()))
            .query(&[("select", "cpf"), ("cpf", filter.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(cpf = %national_id.masked(), status, "uniqueness check failed");
            return Err(ClientError::Api {
                endpoint,
                status,
                body,
            });
        }

        let rows: Vec<serde_json::Value> =
            resp.json().await.map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let exists = !rows.is_empty();
        tracing::debug!(cpf = %national_id.masked(), exists, "uniqueness check");
        Ok(exists)
    }

    /// Insert `record` and return the stored row.
    ///
    /// Calls `POST {base_url}/rest/v1/{table}` with `Prefer: return=representation`.
    /// When the service returns no representation, or one that does not
    /// decode, the submitted record is returned as is.
    pub async fn save(&self, record: &RegistrationRecord) -> Result<RegistrationRecord, SaveError> {
        let endpoint = format!("POST /{API_PREFIX}/{}", self.table);

        let resp = self
            .authorized(self.http.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<PostgrestError>(&body) {
                Ok(pg) if pg.code.is_some() || pg.message.is_some() => pg.into_save_error(),
                _ => SaveError::Client(ClientError::Api {
                    endpoint,
                    status,
                    body,
                }),
            };
            tracing::warn!(
                cpf = %record.national_id.masked(),
                status,
                error = %err,
                "registration insert rejected"
            );
            return Err(err);
        }

        let body = resp.text().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        // The row is inserted once the status is 2xx; a representation that
        // does not decode must not turn that into a refusal.
        let stored = if body.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<Vec<RegistrationRecord>>(&body) {
                Ok(rows) => rows.into_iter().next(),
                Err(e) => {
                    tracing::warn!(
                        cpf = %record.national_id.masked(),
                        error = %e,
                        "stored row representation unreadable, returning submitted record"
                    );
                    None
                }
            }
        };

        tracing::info!(
            cpf = %record.national_id.masked(),
            user_id = %record.user_id,
            "registration stored"
        );
        Ok(stored.unwrap_or_else(|| record.clone()))
    }
}

impl RegistrationStore for RegistryClient {
    async fn national_id_exists(&self, national_id: &NationalId) -> Result<bool, ClientError> {
        RegistryClient::national_id_exists(self, national_id).await
    }

    async fn save(&self, record: &RegistrationRecord) -> Result<RegistrationRecord, SaveError> {
        RegistryClient::save(self, record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg(code: &str, message: &str) -> PostgrestError {
        PostgrestError {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    #[test]
    fn duplicate_cpf_maps_to_duplicate_error() {
        let err = pg(
            "23505",
            "duplicate key value violates unique constraint \"cadastro_inicial_cpf_key\"",
        )
        .into_save_error();
        assert!(matches!(err, SaveError::DuplicateNationalId));
    }

    #[test]
    fn unique_violation_on_other_constraint_is_rejected() {
        let err = pg(
            "23505",
            "duplicate key value violates unique constraint \"cadastro_inicial_pkey\"",
        )
        .into_save_error();
        match err {
            SaveError::Rejected { code, message } => {
                assert_eq!(code.as_deref(), Some("23505"));
                assert!(message.contains("pkey"));
            }
            other => panic!("expected Rejected, got: {other:?}"),
        }
    }

    #[test]
    fn not_null_violation_maps_to_missing_field() {
        let err = pg(
            "23502",
            "null value in column \"numero\" violates not-null constraint",
        )
        .into_save_error();
        assert!(matches!(err, SaveError::MissingRequiredField));
    }

    fn client(base_url: &str, api_key: &str) -> RegistryClient {
        RegistryClient::with_http(
            reqwest::Client::new(),
            &RegistryConfig {
                base_url: base_url.parse().unwrap(),
                api_key: Zeroizing::new(api_key.into()),
                table: "cadastro_inicial".into(),
                timeout_secs: 5,
            },
        )
    }

    #[test]
    fn debug_redacts_key() {
        let client = client("http://127.0.0.1:1", "secret-key");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn table_url_joins_prefix() {
        let client = client("http://127.0.0.1:9000", "k");
        assert_eq!(
            client.table_url(),
            "http://127.0.0.1:9000/rest/v1/cadastro_inicial"
        );
    }
}
