//! Handler for `POST /recognize`.
//!
//! Uploads the submitted photo to object storage, encodes it, and compares
//! it with the reference photo of the claimed employee. The uploaded asset is
//! released exactly once on every path after it is created.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use facegate_core::encoding::FaceEncoding;
use facegate_core::recognition::RecognitionResult;
use facegate_core::storage::{ObjectStorage, UploadedAsset};
use futures::FutureExt;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the claimed employee id.
pub const EMPLOYEE_ID_FIELD: &str = "employeeId";

/// Parsed body of a recognition request.
#[derive(Debug)]
pub struct RecognitionRequest {
    pub image: Bytes,
    pub file_name: Option<String>,
    pub employee_id: Option<String>,
}

// ── Request parsing ──────────────────────────────────────────────────

fn classify_multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge;
    }
    tracing::warn!(error = %err.body_text(), "Unreadable multipart body");
    AppError::NoImage
}

/// Read the `image` and `employeeId` fields. Unknown fields are ignored.
///
/// A zero-byte image counts as missing; a blank employee id counts as absent.
async fn read_request(mut multipart: Multipart) -> AppResult<RecognitionRequest> {
    let mut image = None;
    let mut file_name = None;
    let mut employee_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(classify_multipart_error)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                file_name = field.file_name().map(str::to_string);
                image = Some(field.bytes().await.map_err(classify_multipart_error)?);
            }
            Some(EMPLOYEE_ID_FIELD) => {
                employee_id = Some(field.text().await.map_err(classify_multipart_error)?);
            }
            _ => {}
        }
    }

    let Some(image) = image.filter(|bytes| !bytes.is_empty()) else {
        return Err(AppError::NoImage);
    };

    let employee_id = employee_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    Ok(RecognitionRequest {
        image,
        file_name,
        employee_id,
    })
}

// ── Handler ──────────────────────────────────────────────────────────

/// POST /recognize
///
/// Multipart fields: `image` (required), `employeeId` (optional).
pub async fn recognize(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<RecognitionResult>> {
    tracing::debug!("Received request to /recognize");

    let multipart = multipart.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Request is not multipart/form-data");
        AppError::NoImage
    })?;
    let request = read_request(multipart).await?;
    tracing::debug!(
        file_name = ?request.file_name,
        bytes = request.image.len(),
        employee_id = ?request.employee_id,
        "Received image"
    );

    let Some(storage) = state.storage.clone() else {
        return Err(AppError::StorageNotConfigured);
    };

    // Detached so the asset is still released if this future is dropped
    // (client disconnect, request timeout).
    let task = tokio::spawn(upload_and_recognize(state, storage, request));

    match task.await {
        Ok(outcome) => outcome.map(Json),
        Err(e) => Err(AppError::Unexpected(e.to_string())),
    }
}

/// Upload the image, run recognition, and release the asset.
async fn upload_and_recognize(
    state: AppState,
    storage: Arc<dyn ObjectStorage>,
    request: RecognitionRequest,
) -> AppResult<RecognitionResult> {
    let asset = storage
        .upload(&request.image, request.file_name.as_deref())
        .await
        .map_err(|e| AppError::Unexpected(e.to_string()))?;
    tracing::debug!(asset_id = %asset.id, url = %asset.secure_url, "Uploaded image");

    let outcome = AssertUnwindSafe(identify(&state, &request, &asset))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(AppError::Unexpected(panic_message(panic.as_ref()))));

    storage.release(&asset).await;

    outcome
}

/// Decide who is in the uploaded photo. Never touches object storage.
async fn identify(
    state: &AppState,
    request: &RecognitionRequest,
    asset: &UploadedAsset,
) -> AppResult<RecognitionResult> {
    let faces = state
        .face_engine
        .detect_and_encode(&request.image)
        .await
        .map_err(|e| AppError::Unexpected(e.to_string()))?;

    let Some(probe) = faces.first() else {
        return Err(AppError::NoFaces);
    };
    tracing::debug!(faces = faces.len(), "Detected faces in uploaded image");

    let Some(employee_id) = request.employee_id.as_deref() else {
        tracing::warn!("No employeeId provided");
        return Ok(RecognitionResult::unknown(&asset.secure_url));
    };

    let Some(employees) = state.employees.as_ref() else {
        return Err(AppError::DatabaseNotConfigured);
    };

    let Some(employee) = employees.find_by_id(employee_id).await? else {
        tracing::warn!(employee_id, "No employee found");
        return Ok(RecognitionResult::unknown(&asset.secure_url));
    };

    let Some(reference_url) = employee.reference_image() else {
        tracing::warn!(employee_id, "Employee has no reference image");
        return Ok(RecognitionResult::unknown(&asset.secure_url));
    };

    let reference = reference_encodings(state, reference_url).await?;

    let Some(known) = reference.first() else {
        tracing::warn!(employee_name = %employee.name, "No face encoding found for employee");
        return Ok(RecognitionResult::unknown(&asset.secure_url));
    };

    let result = if state.face_engine.compare(known, probe) {
        RecognitionResult::matched(&employee.name, &employee.id, &asset.secure_url)
    } else {
        RecognitionResult::unknown(&asset.secure_url)
    };

    tracing::debug!(
        employee_name = %result.employee_name,
        employee_id = ?result.employee_id,
        "Recognition result"
    );

    Ok(result)
}

/// Fetch and encode the employee's reference photo.
async fn reference_encodings(state: &AppState, url: &str) -> AppResult<Vec<FaceEncoding>> {
    let image = state
        .reference_images
        .fetch(url)
        .await
        .map_err(|e| AppError::EmployeeImage(e.to_string()))?;

    state
        .face_engine
        .detect_and_encode(&image)
        .await
        .map_err(|e| AppError::EmployeeImage(e.to_string()))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "recognition task panicked".to_string()
    }
}
