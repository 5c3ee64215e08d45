use async_trait::async_trait;
use envelope_domain::config::UspsConfig;

use crate::gateway::GatewayError;
use crate::types::{AddressQuery, TokenGrant, TokenRequest, TokenResponse, UspsValidationResponse};

/// Seam between gateway orchestration and the USPS wire protocol.
#[async_trait]
pub trait ValidationBackend: Send + Sync {
    /// Exchanges the configured client credentials for a fresh bearer token.
    async fn exchange_token(&self) -> Result<TokenGrant, GatewayError>;

    /// Issues one validation call with the given bearer token.
    async fn validate(
        &self,
        bearer: &str,
        query: &AddressQuery,
    ) -> Result<UspsValidationResponse, GatewayError>;
}

/// reqwest-backed production client for the USPS APIs.
pub struct UspsClient {
    http: reqwest::Client,
    config: UspsConfig,
}

impl UspsClient {
    pub fn new(config: UspsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ValidationBackend for UspsClient {
    async fn exchange_token(&self) -> Result<TokenGrant, GatewayError> {
        let request =
            TokenRequest::client_credentials(self.config.client_id(), self.config.client_secret());
        let response = self
            .http
            .post(self.config.token_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Authentication(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(TokenGrant::from(token))
    }

    async fn validate(
        &self,
        bearer: &str,
        query: &AddressQuery,
    ) -> Result<UspsValidationResponse, GatewayError> {
        let response = self
            .http
            .get(self.config.validation_url())
            .query(query)
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Null backend installed when USPS credentials are absent at boot. The
/// service still serves local formatting; every validation attempt surfaces
/// the configuration failure instead.
pub struct MisconfiguredBackend {
    reason: String,
}

impl MisconfiguredBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ValidationBackend for MisconfiguredBackend {
    async fn exchange_token(&self) -> Result<TokenGrant, GatewayError> {
        Err(GatewayError::Configuration(self.reason.clone()))
    }

    async fn validate(
        &self,
        _bearer: &str,
        _query: &AddressQuery,
    ) -> Result<UspsValidationResponse, GatewayError> {
        Err(GatewayError::Configuration(self.reason.clone()))
    }
}
