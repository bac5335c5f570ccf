use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use service::errors::ServiceError;

/// Unexpected failure escaping a handler. Expected outcomes (not-found,
/// not-authorized, not-owner) never reach this type; they resolve to flash
/// + redirect instead.
#[derive(Debug)]
pub struct AppError(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let msg = self.0;
        error!(error = %msg, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        Self(e.to_string())
    }
}
