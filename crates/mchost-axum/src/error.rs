//! Axum-specific error types and mappings.
//!
//! Maps [`SupervisorError`] to HTTP status codes and a JSON body of the form
//! `{"error": "...", "status": 409}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mchost_core::SupervisorError;
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The operation conflicts with the current server state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The server is tracked but cannot be talked to right now.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::ServiceUnavailable(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.message(),
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<SupervisorError> for HttpError {
    fn from(err: SupervisorError) -> Self {
        let message = err.to_string();
        match err {
            SupervisorError::InvalidState { .. } | SupervisorError::NotRunning => {
                Self::Conflict(message)
            }
            SupervisorError::StreamUnavailable => Self::ServiceUnavailable(message),
            SupervisorError::SpawnFailed(_)
            | SupervisorError::KillFailed(_)
            | SupervisorError::WriteFailed(_) => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use mchost_core::ServerStatus;

    #[test]
    fn test_supervisor_error_mapping() {
        let cases = [
            (
                SupervisorError::invalid_state("stop", ServerStatus::Stopped),
                StatusCode::CONFLICT,
            ),
            (SupervisorError::NotRunning, StatusCode::CONFLICT),
            (
                SupervisorError::StreamUnavailable,
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                SupervisorError::SpawnFailed("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SupervisorError::KillFailed("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SupervisorError::WriteFailed("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status_code(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = HttpError::from(SupervisorError::NotRunning).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Server is not running");
        assert_eq!(json["status"], 409);
    }
}
