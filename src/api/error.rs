use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::config::StatusMode;

/// A domain failure on its way out of a handler, rendered as `{"error": ...}`
#[derive(Debug)]
pub struct ApiError {
    pub error: DomainError,
    pub mode: StatusMode,
}

impl ApiError {
    pub fn new(error: DomainError, mode: StatusMode) -> Self {
        Self { error, mode }
    }

    pub fn status(&self) -> StatusCode {
        if self.mode == StatusMode::Legacy {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self.error {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Constraint(_) => StatusCode::CONFLICT,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            DomainError::Upload(_) | DomainError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Curried constructor for `map_err` in handlers
pub fn reject(mode: StatusMode) -> impl Fn(DomainError) -> ApiError {
    move |error| ApiError::new(error, mode)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.error);
        } else {
            tracing::warn!("Request rejected: {}", self.error);
        }

        (status, Json(json!({ "error": self.error.to_string() }))).into_response()
    }
}
