//! Service errors and their HTTP mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use ksp_train::{ArtifactError, TrainError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    /// The artifact could not be read at startup or on reload.
    #[error("failed to load model: {0}")]
    ModelLoad(#[from] ArtifactError),

    /// The pipeline rejected an otherwise well-formed request.
    #[error("prediction failed: {0}")]
    Prediction(#[from] TrainError),

    /// Malformed body or missing fields.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("failed to bind {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, ServeError>;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}

impl ServeError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ModelLoad(_) => "MODEL_UNAVAILABLE",
            Self::Prediction(_) | Self::Bind { .. } | Self::Server(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for ServeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ModelLoad(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Prediction(_) | Self::Bind { .. } | Self::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::InvalidRequest(_) => self.to_string(),
            Self::ModelLoad(err) => err.user_message(),
            _ => "An internal error occurred".to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        })
    }
}
