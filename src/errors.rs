use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::users::dto::ErrorResponse;

/// Errors surfaced to API clients.
///
/// `StorageFailure` carries only the client-facing message. The underlying
/// cause is logged where the failure happens and never crosses the boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("User with this email already exists")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("{0}")]
    StorageFailure(&'static str),
    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    pub const INTERNAL: ApiError = ApiError::StorageFailure("Internal server error");

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
