use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use facegate_core::employee::EmployeeStoreError;
use serde_json::json;

/// Every way a recognition request can end without a verdict.
///
/// Implements [`IntoResponse`] to produce the `{"error": ...}` bodies clients
/// depend on. An unknown match is not an error; it is a normal
/// [`RecognitionResult`](facegate_core::recognition::RecognitionResult).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The multipart body had no usable `image` part.
    #[error("No image provided")]
    NoImage,

    /// The request body exceeded the upload limit.
    #[error("Image exceeds the 16 MiB upload limit")]
    PayloadTooLarge,

    /// The uploaded image contains no detectable face.
    #[error("No faces detected")]
    NoFaces,

    /// Object-storage credentials are missing.
    #[error("Cloudinary not configured")]
    StorageNotConfigured,

    /// No employee database is configured.
    #[error("Database not configured")]
    DatabaseNotConfigured,

    /// The employee lookup failed.
    #[error("Database error")]
    Database(#[from] EmployeeStoreError),

    /// The employee's reference photo could not be fetched or encoded.
    #[error("Could not process employee image")]
    EmployeeImage(String),

    /// Anything else, with the underlying message surfaced to the caller.
    #[error("Face recognition failed: {0}")]
    Unexpected(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoImage | AppError::NoFaces => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::StorageNotConfigured
            | AppError::DatabaseNotConfigured
            | AppError::Database(_)
            | AppError::EmployeeImage(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
            }
            AppError::EmployeeImage(detail) => {
                tracing::error!(error = %detail, "Error loading employee image");
            }
            AppError::Unexpected(detail) => {
                tracing::error!(error = %detail, "Error in face recognition");
            }
            other if status.is_server_error() => {
                tracing::error!(error = %other, "Recognition unavailable");
            }
            other => {
                tracing::warn!(error = %other, "Rejected recognition request");
            }
        }

        let body = json!({ "error": self.to_string() });

        (status, axum::Json(body)).into_response()
    }
}
