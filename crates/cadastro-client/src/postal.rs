//! Typed client for a ViaCEP-compatible postal lookup service.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/ws/{cep}/json/` | Address for an 8-digit CEP |
//!
//! The service answers an unknown CEP with `200 {"erro": true}` (older
//! deployments send the string `"true"`). Both, and a plain 404, map to
//! `Ok(None)`.

use std::time::Duration;

use cadastro_core::{Address, PostalCode};
use serde::Deserialize;

use crate::adapter::PostalLookup;
use crate::config::PostalConfig;
use crate::error::ClientError;

/// Address record as returned by the lookup service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PostalResponse {
    logradouro: String,
    complemento: String,
    bairro: String,
    localidade: String,
    uf: String,
    erro: Option<serde_json::Value>,
}

impl PostalResponse {
    fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_address(self) -> Address {
        Address {
            street: self.logradouro,
            number: String::new(),
            complement: self.complemento,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        }
    }
}

/// Client for the postal lookup service.
#[derive(Debug, Clone)]
pub struct PostalClient {
    http: reqwest::Client,
    base_url: url::Url,
    timeout: Duration,
}

impl PostalClient {
    /// Create a standalone client with its own connection pool.
    pub fn new(config: &PostalConfig) -> Result<Self, ClientError> {
        Ok(Self::with_http(crate::build_http()?, config))
    }

    pub(crate) fn with_http(http: reqwest::Client, config: &PostalConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Look up the address for `postal_code`.
    ///
    /// Calls `GET {base_url}/ws/{cep}/json/`.
    pub async fn lookup(&self, postal_code: &PostalCode) -> Result<Option<Address>, ClientError> {
        let endpoint = "GET /ws/{cep}/json/";
        let url = format!("{}ws/{}/json/", self.base_url, postal_code.as_str());

        tracing::debug!(cep = %postal_code, "looking up postal code");

        let resp = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::info!(cep = %postal_code, "postal code not found");
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(cep = %postal_code, status, "postal lookup failed");
            return Err(ClientError::Api {
                endpoint: endpoint.into(),
                status,
                body,
            });
        }

        let body: PostalResponse = resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;

        if body.is_not_found() {
            tracing::info!(cep = %postal_code, "postal code not found");
            return Ok(None);
        }

        Ok(Some(body.into_address()))
    }

    /// Look up a raw, possibly punctuated CEP.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidInput`] without sending a request when
    /// `raw` does not hold 8 digits.
    pub async fn lookup_raw(&self, raw: &str) -> Result<Option<Address>, ClientError> {
        let postal_code = PostalCode::new(raw)?;
        self.lookup(&postal_code).await
    }
}

impl PostalLookup for PostalClient {
    async fn lookup(&self, postal_code: &PostalCode) -> Result<Option<Address>, ClientError> {
        PostalClient::lookup(self, postal_code).await
    }
}
