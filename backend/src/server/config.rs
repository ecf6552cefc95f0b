//! Application configuration loaded via OrthoConfig.
//!
//! Values come from `NUTRIFIX_`-prefixed environment variables, a config
//! file, or CLI flags, in OrthoConfig's usual precedence order.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_COMPLETION_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_COMPLETION_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_COMPLETION_TEMPERATURE: f64 = 0.7;
const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 1000;

/// Server, database, credential, and completion-service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NUTRIFIX")]
pub struct AppSettings {
    /// PostgreSQL connection URL. Required.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Seconds to wait for a pooled connection before failing.
    pub db_connection_timeout_secs: Option<u64>,
    /// Secret used to sign bearer tokens. Required.
    pub jwt_secret: Option<String>,
    /// bcrypt work factor for password hashing.
    pub bcrypt_cost: Option<u32>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// API key for the completion service. The advisory endpoints fail
    /// with an external-service error when unset.
    pub completion_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible completion API.
    pub completion_base_url: Option<String>,
    /// Completion model identifier.
    pub completion_model: Option<String>,
    /// Completion sampling temperature.
    pub completion_temperature: Option<f64>,
    /// Completion reply cap in tokens.
    pub completion_max_tokens: Option<u32>,
}

impl AppSettings {
    /// Configured bind host, falling back to localhost.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured bind port, falling back to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Configured bcrypt work factor, falling back to 10.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST)
    }

    /// Configured pool size, falling back to the pool's default.
    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(PoolConfig::DEFAULT_MAX_SIZE)
    }

    /// Configured checkout timeout, falling back to the pool's default.
    pub fn db_connection_timeout(&self) -> Duration {
        self.db_connection_timeout_secs
            .map_or(PoolConfig::DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs)
    }

    /// Pool configuration for the given database URL, applying any
    /// configured size and timeout overrides.
    pub fn pool_config(&self, database_url: impl Into<String>) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.db_pool_size())
            .with_connection_timeout(self.db_connection_timeout())
    }

    /// Configured completion base URL, falling back to the Groq endpoint.
    pub fn completion_base_url(&self) -> &str {
        self.completion_base_url
            .as_deref()
            .unwrap_or(DEFAULT_COMPLETION_BASE_URL)
    }

    /// Configured completion model, falling back to `llama-3.1-8b-instant`.
    pub fn completion_model(&self) -> &str {
        self.completion_model
            .as_deref()
            .unwrap_or(DEFAULT_COMPLETION_MODEL)
    }

    /// Configured sampling temperature, falling back to 0.7.
    pub fn completion_temperature(&self) -> f64 {
        self.completion_temperature
            .unwrap_or(DEFAULT_COMPLETION_TEMPERATURE)
    }

    /// Configured reply cap, falling back to 1000 tokens.
    pub fn completion_max_tokens(&self) -> u32 {
        self.completion_max_tokens
            .unwrap_or(DEFAULT_COMPLETION_MAX_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing and fallbacks.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("nutrifix-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("NUTRIFIX_DATABASE_URL", None::<String>),
            ("NUTRIFIX_DB_POOL_SIZE", None::<String>),
            ("NUTRIFIX_DB_CONNECTION_TIMEOUT_SECS", None::<String>),
            ("NUTRIFIX_JWT_SECRET", None::<String>),
            ("NUTRIFIX_BCRYPT_COST", None::<String>),
            ("NUTRIFIX_HOST", None::<String>),
            ("NUTRIFIX_PORT", None::<String>),
            ("NUTRIFIX_COMPLETION_API_KEY", None::<String>),
            ("NUTRIFIX_COMPLETION_BASE_URL", None::<String>),
            ("NUTRIFIX_COMPLETION_MODEL", None::<String>),
            ("NUTRIFIX_COMPLETION_TEMPERATURE", None::<String>),
            ("NUTRIFIX_COMPLETION_MAX_TOKENS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(settings.bcrypt_cost(), DEFAULT_BCRYPT_COST);
        assert_eq!(settings.db_pool_size(), PoolConfig::DEFAULT_MAX_SIZE);
        assert_eq!(
            settings.db_connection_timeout(),
            PoolConfig::DEFAULT_CONNECTION_TIMEOUT
        );
        assert_eq!(settings.completion_base_url(), DEFAULT_COMPLETION_BASE_URL);
        assert_eq!(settings.completion_model(), DEFAULT_COMPLETION_MODEL);
        assert_eq!(
            settings.completion_temperature(),
            DEFAULT_COMPLETION_TEMPERATURE
        );
        assert_eq!(
            settings.completion_max_tokens(),
            DEFAULT_COMPLETION_MAX_TOKENS
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "NUTRIFIX_DATABASE_URL",
                Some("postgres://localhost/nutrifix".to_owned()),
            ),
            ("NUTRIFIX_DB_POOL_SIZE", Some("25".to_owned())),
            ("NUTRIFIX_DB_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
            ("NUTRIFIX_JWT_SECRET", Some("s3cret".to_owned())),
            ("NUTRIFIX_BCRYPT_COST", Some("12".to_owned())),
            ("NUTRIFIX_HOST", Some("0.0.0.0".to_owned())),
            ("NUTRIFIX_PORT", Some("3000".to_owned())),
            ("NUTRIFIX_COMPLETION_API_KEY", Some("gsk-abc".to_owned())),
            ("NUTRIFIX_COMPLETION_BASE_URL", None::<String>),
            ("NUTRIFIX_COMPLETION_MODEL", None::<String>),
            ("NUTRIFIX_COMPLETION_TEMPERATURE", Some("0.2".to_owned())),
            ("NUTRIFIX_COMPLETION_MAX_TOKENS", Some("500".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/nutrifix")
        );
        assert_eq!(settings.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(settings.db_pool_size(), 25);
        assert_eq!(settings.db_connection_timeout(), Duration::from_secs(5));
        assert_eq!(settings.bcrypt_cost(), 12);
        assert_eq!(settings.host(), "0.0.0.0");
        assert_eq!(settings.port(), 3000);
        assert_eq!(settings.completion_api_key.as_deref(), Some("gsk-abc"));
        assert_eq!(settings.completion_temperature(), 0.2);
        assert_eq!(settings.completion_max_tokens(), 500);
    }
}
