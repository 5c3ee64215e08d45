pub mod format;
pub mod metrics;
pub mod validate;

pub use format::format_address_handler;
pub use metrics::metrics_handler;
pub use validate::validate_address_handler;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use envelope_gateway::{GatewayError, GatewayErrorKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("both sender and recipient addresses are required")]
    MissingAddress,
    #[error("{section} is incomplete: missing {fields}")]
    IncompleteAddress { section: &'static str, fields: String },
    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingAddress | ApiError::IncompleteAddress { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Gateway(err) => match err.kind() {
                GatewayErrorKind::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
                GatewayErrorKind::AuthenticationFailed
                | GatewayErrorKind::UpstreamRejected
                | GatewayErrorKind::TransportFailure => StatusCode::BAD_GATEWAY,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}
