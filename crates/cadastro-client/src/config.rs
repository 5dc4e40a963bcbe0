//! Collaborator configuration.
//!
//! Two services are configured independently so that a postal lookup can run
//! without database credentials:
//!
//! - [`PostalConfig`]: the ViaCEP-compatible address service.
//! - [`RegistryConfig`]: the PostgREST endpoint over the registration table,
//!   used for the uniqueness check and for persistence.

use url::Url;
use zeroize::Zeroizing;

/// Default postal lookup service.
pub const DEFAULT_POSTAL_URL: &str = "https://viacep.com.br";

/// Default registration table.
pub const DEFAULT_TABLE: &str = "cadastro_inicial";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Postal lookup service configuration.
#[derive(Debug, Clone)]
pub struct PostalConfig {
    /// Base URL of the lookup service.
    /// Default: <https://viacep.com.br>
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl PostalConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CADASTRO_POSTAL_URL` (default: `https://viacep.com.br`)
    /// - `CADASTRO_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("CADASTRO_POSTAL_URL", DEFAULT_POSTAL_URL)?,
            timeout_secs: env_timeout(),
        })
    }
}

/// Registration database configuration.
///
/// Custom `Debug` implementation redacts the `api_key` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct RegistryConfig {
    /// PostgREST base URL (the project root, without `/rest/v1`).
    pub base_url: Url,
    /// API key sent as both `apikey` and bearer token.
    pub api_key: Zeroizing<String>,
    /// Table holding the registrations.
    pub table: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CADASTRO_DATABASE_URL` (required)
    /// - `CADASTRO_DATABASE_KEY` (required)
    /// - `CADASTRO_TABLE` (default: `cadastro_inicial`)
    /// - `CADASTRO_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("CADASTRO_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("CADASTRO_DATABASE_URL"))?;
        let base_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("CADASTRO_DATABASE_URL".to_string(), e.to_string()))?;
        let api_key = std::env::var("CADASTRO_DATABASE_KEY")
            .map_err(|_| ConfigError::Missing("CADASTRO_DATABASE_KEY"))?;

        Ok(Self {
            base_url,
            api_key: Zeroizing::new(api_key),
            table: std::env::var("CADASTRO_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string()),
            timeout_secs: env_timeout(),
        })
    }
}

/// Configuration for every collaborator.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub postal: PostalConfig,
    pub registry: RegistryConfig,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            postal: PostalConfig::from_env()?,
            registry: RegistryConfig::from_env()?,
        })
    }

    /// Create a configuration pointing to local mock servers (for testing):
    /// the registry on `base_port`, the postal service on `base_port + 1`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed
    /// or `base_port` leaves no room for the postal port.
    pub fn local_mock(base_port: u16, api_key: &str) -> Result<Self, ConfigError> {
        let make_url = |port: u16| -> Result<Url, ConfigError> {
            Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))
        };
        let postal_port = base_port.checked_add(1).ok_or_else(|| {
            ConfigError::InvalidUrl(
                "localhost".to_string(),
                format!("no port above {base_port} for the postal service"),
            )
        })?;
        Ok(Self {
            postal: PostalConfig {
                base_url: make_url(postal_port)?,
                timeout_secs: 5,
            },
            registry: RegistryConfig {
                base_url: make_url(base_port)?,
                api_key: Zeroizing::new(api_key.to_string()),
                table: DEFAULT_TABLE.to_string(),
                timeout_secs: 5,
            },
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_timeout() -> u64 {
    std::env::var("CADASTRO_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
