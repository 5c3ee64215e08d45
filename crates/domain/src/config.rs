//! Environment-driven configuration structures shared by all binaries.

use std::env;

use thiserror::Error;

/// Default USPS TEM (test environment) endpoints; production deployments
/// override both via environment variables.
pub const DEFAULT_TOKEN_URL: &str = "https://apis-tem.usps.com/oauth2/v3/token";
pub const DEFAULT_VALIDATION_URL: &str = "https://apis-tem.usps.com/addresses/v3/address";

/// API-specific configuration (HTTP bind target only) so the HTTP surface
/// does not require USPS credentials just to boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_bind_address: String,
    api_unix_socket: Option<String>,
}

impl ApiConfig {
    /// Loads only the environment variables required by the API binary.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            api_bind_address: get_required_var("API_BIND_ADDRESS")?,
            api_unix_socket: get_optional_var("API_UNIX_SOCKET"),
        })
    }

    pub fn api_bind_address(&self) -> &str {
        &self.api_bind_address
    }

    pub fn api_unix_socket(&self) -> Option<&str> {
        self.api_unix_socket.as_deref()
    }
}

/// Credentials and endpoints for the USPS APIs. Missing credentials surface
/// as `ConfigError::MissingVar`, the `ConfigurationMissing` failure class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UspsConfig {
    token_url: String,
    client_id: String,
    client_secret: String,
    validation_url: String,
}

impl UspsConfig {
    /// Loads USPS credentials and endpoints. The endpoints default to the
    /// USPS TEM URLs; the client id/secret have no sane default.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            token_url: get_optional_var("USPS_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            client_id: get_required_var("USPS_CLIENT_ID")?,
            client_secret: get_required_var("USPS_CLIENT_SECRET")?,
            validation_url: get_optional_var("USPS_ADDRESS_VALIDATION_URL")
                .unwrap_or_else(|| DEFAULT_VALIDATION_URL.to_string()),
        })
    }

    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        validation_url: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            validation_url: validation_url.into(),
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn validation_url(&self) -> &str {
        &self.validation_url
    }
}

fn get_required_var(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ConfigError::MissingVar { key })
            } else {
                Ok(trimmed.to_string())
            }
        }
        Err(_) => Err(ConfigError::MissingVar { key }),
    }
}

fn get_optional_var(key: &'static str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn hydrate_env_file() -> Result<(), ConfigError> {
    if env::var_os("ENVELOPE_SKIP_DOTENV").is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigError::Dotenv { source: err }),
    }

    Ok(())
}

/// Errors emitted when `.env` hydration or environment parsing fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{key}`")]
    MissingVar { key: &'static str },
    #[error("failed to load .env file: {source}")]
    Dotenv {
        #[from]
        source: dotenvy::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    fn set_env() {
        env::set_var("ENVELOPE_SKIP_DOTENV", "1");
        env::set_var("API_BIND_ADDRESS", "127.0.0.1:8080");
        env::remove_var("API_UNIX_SOCKET");
        env::set_var("USPS_CLIENT_ID", "client-id");
        env::set_var("USPS_CLIENT_SECRET", "client-secret");
        env::remove_var("USPS_TOKEN_URL");
        env::remove_var("USPS_ADDRESS_VALIDATION_URL");
    }

    #[test]
    fn api_config_reads_bind_address() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        env::set_var("API_BIND_ADDRESS", " 127.0.0.1:9999 ");

        let config = ApiConfig::load_from_env().expect("api config loads");
        assert_eq!(config.api_bind_address(), "127.0.0.1:9999");
        assert_eq!(config.api_unix_socket(), None);

        set_env();
    }

    #[test]
    fn api_config_supports_unix_socket() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        env::set_var("API_UNIX_SOCKET", "/tmp/envelope-api.sock");

        let config = ApiConfig::load_from_env().expect("config loads");
        assert_eq!(config.api_unix_socket(), Some("/tmp/envelope-api.sock"));

        set_env();
    }

    #[test]
    fn usps_config_defaults_endpoints() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();

        let config = UspsConfig::load_from_env().expect("usps config loads");
        assert_eq!(config.token_url(), DEFAULT_TOKEN_URL);
        assert_eq!(config.validation_url(), DEFAULT_VALIDATION_URL);
        assert_eq!(config.client_id(), "client-id");
    }

    #[test]
    fn usps_config_requires_credentials() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        env::remove_var("USPS_CLIENT_SECRET");

        let err = UspsConfig::load_from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar {
                key: "USPS_CLIENT_SECRET"
            }
        ));

        set_env();
    }

    #[test]
    fn empty_required_env_var_is_treated_as_missing() {
        let _guard = ENV_GUARD.lock().unwrap();
        set_env();
        env::set_var("USPS_CLIENT_ID", "   ");

        let err = UspsConfig::load_from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar {
                key: "USPS_CLIENT_ID"
            }
        ));

        set_env();
    }
}
