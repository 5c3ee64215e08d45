use actix_web::{web, HttpResponse};
use envelope_domain::model::AddressRecord;
use envelope_gateway::ValidationReport;
use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    #[serde(default)]
    pub sender_address: Option<AddressRecord>,
    #[serde(default)]
    pub recipient_address: Option<AddressRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub success: bool,
    pub sender_validation: ValidatedAddress,
    pub recipient_validation: ValidatedAddress,
    pub has_corrections: bool,
}

/// The provider's corrected address merged over the submitted record: any
/// field the provider omitted falls back to what the caller sent.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedAddress {
    pub name: String,
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub corrections: Vec<String>,
}

impl ValidatedAddress {
    fn merge(submitted: &AddressRecord, report: ValidationReport) -> Self {
        Self {
            name: submitted.name.clone(),
            line1: report.street.unwrap_or_else(|| submitted.line1.clone()),
            line2: report
                .secondary
                .unwrap_or_else(|| submitted.line2().to_string()),
            city: report.city.unwrap_or_else(|| submitted.city.clone()),
            state: report.state.unwrap_or_else(|| submitted.state.clone()),
            zip_code: report.zip.unwrap_or_else(|| submitted.zip_code.clone()),
            corrections: report.corrections,
        }
    }
}

pub async fn validate_address_handler(
    state: web::Data<AppState>,
    payload: web::Json<ValidateRequest>,
) -> Result<HttpResponse, ApiError> {
    let sender = require_address(payload.sender_address.as_ref())?;
    let recipient = require_address(payload.recipient_address.as_ref())?;
    require_complete("senderAddress", sender)?;
    require_complete("recipientAddress", recipient)?;

    let (sender_report, recipient_report) = state
        .gateway()
        .validate_pair(sender, recipient)
        .await
        .inspect_err(|err| {
            let status_tag = err.kind().as_ref().to_owned();
            counter!("api_validate_requests_total", "status" => status_tag).increment(1);
        })?;

    let has_corrections =
        sender_report.has_corrections() || recipient_report.has_corrections();
    counter!("api_validate_requests_total", "status" => "ok").increment(1);

    Ok(HttpResponse::Ok().json(ValidateResponse {
        success: true,
        sender_validation: ValidatedAddress::merge(sender, sender_report),
        recipient_validation: ValidatedAddress::merge(recipient, recipient_report),
        has_corrections,
    }))
}

fn require_address(address: Option<&AddressRecord>) -> Result<&AddressRecord, ApiError> {
    address.ok_or_else(|| {
        counter!("api_validate_requests_total", "status" => "missing_address").increment(1);
        ApiError::MissingAddress
    })
}

fn require_complete(section: &'static str, address: &AddressRecord) -> Result<(), ApiError> {
    let missing = address.missing_fields();
    if missing.is_empty() {
        return Ok(());
    }
    counter!("api_validate_requests_total", "status" => "incomplete_address").increment(1);
    Err(ApiError::IncompleteAddress {
        section,
        fields: missing.join(", "),
    })
}
