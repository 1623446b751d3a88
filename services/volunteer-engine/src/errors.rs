use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, VolunteerEngineError>;

#[derive(Error, Debug)]
pub enum VolunteerEngineError {
    #[error("Campaign not found: {0}")]
    CampaignNotFound(Uuid),

    #[error("Already joined as volunteer")]
    AlreadyJoined,

    #[error("No volunteer spots available")]
    CampaignFull,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ResponseError for VolunteerEngineError {
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
            VolunteerEngineError::CampaignNotFound(_) => StatusCode::NOT_FOUND,
            VolunteerEngineError::AlreadyJoined => StatusCode::CONFLICT,
            VolunteerEngineError::CampaignFull => StatusCode::CONFLICT,
            VolunteerEngineError::Validation(_) => StatusCode::BAD_REQUEST,
            VolunteerEngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl VolunteerEngineError {
    fn error_type(&self) -> &str {
        match self {
            VolunteerEngineError::CampaignNotFound(_) => "not_found",
            VolunteerEngineError::AlreadyJoined => "already_joined",
            VolunteerEngineError::CampaignFull => "campaign_full",
            VolunteerEngineError::Validation(_) => "validation_error",
            VolunteerEngineError::Internal(_) => "internal_error",
        }
    }
}
