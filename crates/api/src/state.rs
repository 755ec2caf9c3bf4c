use std::sync::Arc;

use facegate_cloud::fetch::ReferenceImageFetcher;
use facegate_core::employee::EmployeeStore;
use facegate_core::face_engine::FaceEngine;
use facegate_core::storage::ObjectStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Collaborators that depend on optional configuration are `None` when that
/// configuration is missing.
#[derive(Clone)]
pub struct AppState {
    /// Object storage for uploaded images.
    pub storage: Option<Arc<dyn ObjectStorage>>,
    /// Employee directory.
    pub employees: Option<Arc<dyn EmployeeStore>>,
    /// Face detection and comparison.
    pub face_engine: Arc<dyn FaceEngine>,
    /// Downloads employee reference photos.
    pub reference_images: ReferenceImageFetcher,
}
