use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, DonationEngineError>;

#[derive(Error, Debug)]
pub enum DonationEngineError {
    #[error("Donation not found: {0}")]
    DonationNotFound(Uuid),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(Uuid),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid donation type: {0}")]
    InvalidType(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Downstream failure ({collaborator}): {reason}")]
    DownstreamFailure { collaborator: String, reason: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for DonationEngineError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        HttpResponse::build(status_code).json(json!({
            "error": {
                "code": status_code.as_u16(),
                "message": error_message,
                "type": self.error_type()
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DonationEngineError::DonationNotFound(_) => StatusCode::NOT_FOUND,
            DonationEngineError::CampaignNotFound(_) => StatusCode::NOT_FOUND,
            DonationEngineError::InvalidState(_) => StatusCode::CONFLICT,
            DonationEngineError::InvalidType(_) => StatusCode::BAD_REQUEST,
            DonationEngineError::Validation(_) => StatusCode::BAD_REQUEST,
            DonationEngineError::DownstreamFailure { .. } => StatusCode::BAD_GATEWAY,
            DonationEngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl DonationEngineError {
    fn error_type(&self) -> &str {
        match self {
            DonationEngineError::DonationNotFound(_) => "not_found",
            DonationEngineError::CampaignNotFound(_) => "not_found",
            DonationEngineError::InvalidState(_) => "invalid_state",
            DonationEngineError::InvalidType(_) => "invalid_type",
            DonationEngineError::Validation(_) => "validation_error",
            DonationEngineError::DownstreamFailure { .. } => "downstream_failure",
            DonationEngineError::Internal(_) => "internal_error",
        }
    }
}
