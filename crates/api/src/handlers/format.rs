use actix_web::{web, HttpResponse};
use envelope_domain::format::normalize_address;
use envelope_domain::model::{AddressRecord, FormattedAddress};
use metrics::counter;
use serde::{Deserialize, Serialize};

/// Local normalization preview. Pure text work, no network, and total over
/// any submitted content.
#[derive(Debug, Deserialize, Serialize)]
pub struct FormatRequest {
    pub address: AddressRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormatResponse {
    pub success: bool,
    pub formatted: FormattedAddress,
}

pub async fn format_address_handler(payload: web::Json<FormatRequest>) -> HttpResponse {
    let formatted = normalize_address(&payload.address);
    counter!("api_format_requests_total").increment(1);
    HttpResponse::Ok().json(FormatResponse {
        success: true,
        formatted,
    })
}
