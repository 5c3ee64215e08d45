//! Wire types for the USPS OAuth and address validation endpoints, plus the
//! post-processed report handed back to callers. Provider fields are all
//! optional; the schema is an external contract we do not control.

use envelope_domain::model::AddressRecord;
use serde::{Deserialize, Serialize};

/// Client-credentials exchange payload sent to the token endpoint.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn client_credentials(client_id: &'a str, client_secret: &'a str) -> Self {
        Self {
            grant_type: "client_credentials",
            client_id,
            client_secret,
        }
    }
}

/// Token endpoint response. Only the token string and lifetime matter to us.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub issued_at: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// The usable result of a token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
}

impl From<TokenResponse> for TokenGrant {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            expires_in: response.expires_in,
        }
    }
}

/// Query parameters for one validation call, serialized straight onto the
/// request URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressQuery {
    pub street_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_address: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(rename = "ZIPCode")]
    pub zip_code: String,
}

impl From<&AddressRecord> for AddressQuery {
    fn from(record: &AddressRecord) -> Self {
        Self {
            street_address: record.line1.clone(),
            secondary_address: record
                .line2
                .as_ref()
                .filter(|line| !line.trim().is_empty())
                .cloned(),
            city: record.city.clone(),
            state: record.state.clone(),
            zip_code: record.zip_code.clone(),
        }
    }
}

/// Corrected address object as returned by the validation endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UspsAddress {
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub secondary_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, rename = "ZIPCode")]
    pub zip_code: Option<String>,
    #[serde(default, rename = "ZIPPlus4")]
    pub zip_plus4: Option<String>,
}

/// A single correction or match advisory attached to a response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UspsAdvisory {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Raw validation endpoint response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UspsValidationResponse {
    #[serde(default)]
    pub firm: Option<String>,
    #[serde(default)]
    pub address: Option<UspsAddress>,
    #[serde(default)]
    pub corrections: Vec<UspsAdvisory>,
    #[serde(default)]
    pub matches: Vec<UspsAdvisory>,
    #[serde(default)]
    pub additional_info: Option<serde_json::Value>,
}

/// Post-processed projection of one validation response: the corrected
/// fields the provider returned (absent fields stay `None` so the caller
/// can fall back to the submitted value) and the advisory texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub street: Option<String>,
    pub secondary: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub corrections: Vec<String>,
}

impl ValidationReport {
    pub fn has_corrections(&self) -> bool {
        !self.corrections.is_empty()
    }
}

impl From<UspsValidationResponse> for ValidationReport {
    fn from(response: UspsValidationResponse) -> Self {
        let address = response.address.unwrap_or_default();

        // ZIP and ZIP+4 arrive as separate fields; rejoin them for display.
        let zip = match (&address.zip_code, &address.zip_plus4) {
            (Some(zip), Some(plus4)) if !plus4.trim().is_empty() => {
                Some(format!("{}-{}", zip, plus4))
            }
            (zip, _) => zip.clone(),
        };

        let corrections = response
            .corrections
            .into_iter()
            .chain(response.matches)
            .filter_map(|advisory| advisory.text)
            .filter(|text| !text.trim().is_empty())
            .collect();

        Self {
            street: address.street_address,
            secondary: address.secondary_address,
            city: address.city,
            state: address.state,
            zip,
            corrections,
        }
    }
}
