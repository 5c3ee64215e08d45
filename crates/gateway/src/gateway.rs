use std::sync::Arc;

use chrono::Utc;
use envelope_domain::config::ConfigError;
use envelope_domain::model::AddressRecord;
use envelope_domain::services::credential::CredentialCache;
use metrics::counter;
use thiserror::Error;
use tracing::{debug, warn};

use crate::client::ValidationBackend;
use crate::types::{AddressQuery, ValidationReport};

/// Classified gateway failures surfaced to the caller. No failure is retried
/// internally; each propagates with a caller-safe message after logging.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("usps api is not configured: {0}")]
    Configuration(String),
    #[error("usps authentication failed: {0}")]
    Authentication(String),
    #[error("usps validation rejected (status {status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("usps transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            GatewayError::Configuration(_) => GatewayErrorKind::ConfigurationMissing,
            GatewayError::Authentication(_) => GatewayErrorKind::AuthenticationFailed,
            GatewayError::Upstream { .. } => GatewayErrorKind::UpstreamRejected,
            GatewayError::Transport(_) => GatewayErrorKind::TransportFailure,
        }
    }
}

/// Stable tags for metric labels and classification checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GatewayErrorKind {
    ConfigurationMissing,
    AuthenticationFailed,
    UpstreamRejected,
    TransportFailure,
}

impl From<ConfigError> for GatewayError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

/// Proxy that holds the cached bearer token and fans validation calls out to
/// the backend. Input completeness is the caller's responsibility; the
/// gateway assumes both records have already passed `is_complete`.
pub struct ValidationGateway {
    backend: Arc<dyn ValidationBackend>,
    credentials: CredentialCache,
}

impl ValidationGateway {
    pub fn new(backend: Arc<dyn ValidationBackend>, credentials: CredentialCache) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub fn with_backend(backend: Arc<dyn ValidationBackend>) -> Self {
        Self::new(backend, CredentialCache::new())
    }

    /// Validates both addresses of an envelope concurrently. Either call
    /// failing fails the pair; no partial result is returned and the sibling
    /// call is left to settle on its own.
    pub async fn validate_pair(
        &self,
        sender: &AddressRecord,
        recipient: &AddressRecord,
    ) -> Result<(ValidationReport, ValidationReport), GatewayError> {
        let bearer = self.bearer_token().await?;

        let sender_query = AddressQuery::from(sender);
        let recipient_query = AddressQuery::from(recipient);

        let (sender_result, recipient_result) = tokio::join!(
            self.validate_one(&bearer, &sender_query),
            self.validate_one(&bearer, &recipient_query),
        );

        match (sender_result, recipient_result) {
            (Ok(sender_report), Ok(recipient_report)) => {
                counter!("gateway_pair_validations_total", "result" => "ok").increment(1);
                Ok((sender_report, recipient_report))
            }
            (Err(err), _) | (_, Err(err)) => {
                let result_tag = err.kind().as_ref().to_owned();
                counter!("gateway_pair_validations_total", "result" => result_tag).increment(1);
                Err(err)
            }
        }
    }

    /// Returns a bearer token, reusing the cached one while it is fresh.
    /// Concurrent stale readers may each trigger an exchange; the later
    /// write wins and both tokens remain usable.
    async fn bearer_token(&self) -> Result<String, GatewayError> {
        let now = Utc::now();
        if let Some(token) = self.credentials.bearer(now) {
            counter!("gateway_token_requests_total", "source" => "cache").increment(1);
            return Ok(token);
        }

        counter!("gateway_token_requests_total", "source" => "exchange").increment(1);
        let grant = self.backend.exchange_token().await.inspect_err(|err| {
            warn!(error = %err, "usps token exchange failed");
        })?;
        debug!(expires_in = grant.expires_in, "usps token exchanged");
        self.credentials
            .store_grant(grant.access_token.clone(), grant.expires_in, Utc::now());
        Ok(grant.access_token)
    }

    async fn validate_one(
        &self,
        bearer: &str,
        query: &AddressQuery,
    ) -> Result<ValidationReport, GatewayError> {
        let response = self.backend.validate(bearer, query).await.inspect_err(|err| {
            let result_tag = err.kind().as_ref().to_owned();
            counter!("gateway_validation_calls_total", "result" => result_tag).increment(1);
            warn!(error = %err, street = %query.street_address, "usps validation call failed");
        })?;
        counter!("gateway_validation_calls_total", "result" => "ok").increment(1);
        Ok(ValidationReport::from(response))
    }
}
