use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("missing required column: {0}")]
    SchemaMismatch(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::SchemaMismatch(_) => "schema_mismatch",
            ApiError::ModelUnavailable(_) => "model_unavailable",
            ApiError::PredictionFailed(_) => "prediction_failed",
            ApiError::Config(_) => "config",
        }
    }

    /// Attaches a 1-based row number to input errors raised while working
    /// through a batch, so callers can locate the offending source row.
    pub fn with_row(self, row: usize) -> Self {
        match self {
            ApiError::InvalidInput(msg) => {
                ApiError::InvalidInput(format!("row {}: {msg}", row + 1))
            }
            other => other,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::SchemaMismatch(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable(_) | ApiError::PredictionFailed(_) | ApiError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
