//! Application error type mapping to HTTP status codes.
//!
//! Every error body has the shape `{"message": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use weddingwall_types::error::{IngestError, RotationError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Ingest(IngestError),
    Rotation(RotationError),
    /// Nothing to serve.
    NotFound(String),
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        AppError::Ingest(e)
    }
}

impl From<RotationError> for AppError {
    fn from(e: RotationError) -> Self {
        AppError::Rotation(e)
    }
}

const INTERNAL: &str = "Internal Server Error";

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Ingest(IngestError::MissingSignature) => (
                StatusCode::BAD_REQUEST,
                "Bad Request: missing signature".to_string(),
            ),
            AppError::Ingest(IngestError::InvalidSignature) => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized: invalid signature".to_string(),
            ),
            AppError::Ingest(IngestError::MalformedPayload(_)) => (
                StatusCode::BAD_REQUEST,
                "Bad Request: invalid JSON".to_string(),
            ),
            AppError::Ingest(IngestError::Dispatch(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
            }
            AppError::Rotation(RotationError::CriticalMove { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to move new image to displaying directory".to_string(),
            ),
            AppError::Rotation(RotationError::ReadFailed { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read image from displaying directory".to_string(),
            ),
            AppError::Rotation(RotationError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            let detail = match &self {
                AppError::Ingest(e) => e.to_string(),
                AppError::Rotation(e) => e.to_string(),
                AppError::NotFound(msg) => msg.clone(),
            };
            tracing::error!(status = status.as_u16(), error = %detail, "request failed");
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weddingwall_types::error::StorageError;

    fn status_of(e: AppError) -> StatusCode {
        e.into_response().status()
    }

    #[test]
    fn test_ingest_error_statuses() {
        assert_eq!(status_of(IngestError::MissingSignature.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(IngestError::InvalidSignature.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(IngestError::MalformedPayload("eof".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(IngestError::Dispatch("reply".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rotation_error_statuses() {
        let critical = RotationError::CriticalMove {
            name: "a.jpg".into(),
            source: StorageError::Io("denied".into()),
        };
        assert_eq!(status_of(critical.into()), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_of(AppError::NotFound("No image available to display".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let (_, message) = AppError::from(IngestError::Dispatch("token abc".into())).status_and_message();
        assert_eq!(message, "Internal Server Error");
    }
}
