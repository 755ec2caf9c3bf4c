//! Shared fixtures for API integration tests.
//!
//! Collaborators are replaced with in-memory fakes. Employee reference photos
//! are served by an `httpmock` server so the real [`ReferenceImageFetcher`]
//! is exercised.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use facegate_api::config::ServerConfig;
use facegate_api::router::build_app_router;
use facegate_api::state::AppState;
use facegate_cloud::fetch::ReferenceImageFetcher;
use facegate_core::employee::{EmployeeRecord, EmployeeStore, EmployeeStoreError};
use facegate_core::encoding::{is_match, FaceEncoding, DEFAULT_MATCH_TOLERANCE};
use facegate_core::face_engine::{FaceEngine, FaceEngineError};
use facegate_core::storage::{ObjectStorage, StorageError, UploadedAsset};
use facegate_core::types::EmployeeId;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Image fixtures (bytes understood by FakeFaceEngine)
// ---------------------------------------------------------------------------

/// Uploaded photo of Ada.
pub const ADA_PHOTO: &[u8] = b"photo:ada";
/// Uploaded photo of someone who is not Ada.
pub const STRANGER_PHOTO: &[u8] = b"photo:stranger";
/// Uploaded photo without any face.
pub const EMPTY_PHOTO: &[u8] = b"photo:landscape";
/// Bytes the engine cannot decode.
pub const CORRUPT_PHOTO: &[u8] = b"photo:corrupt";
/// Bytes that make the engine panic.
pub const PANIC_PHOTO: &[u8] = b"photo:panic";
/// Photo of Ada that takes [`SLOW_ENCODE_DELAY`] to encode.
pub const SLOW_PHOTO: &[u8] = b"photo:ada-slow";

/// How long the engine spends on [`SLOW_PHOTO`].
pub const SLOW_ENCODE_DELAY: Duration = Duration::from_millis(2000);

const ADA_REFERENCE: &[u8] = b"reference:ada";
const FACELESS_REFERENCE: &[u8] = b"reference:faceless";
const GARBLED_REFERENCE: &[u8] = b"reference:garbled";

// ---------------------------------------------------------------------------
// Employee fixtures
// ---------------------------------------------------------------------------

pub const ADA_ID: &str = "64b7f0c2a1d3e4f5a6b7c8d9";
pub const ADA_NAME: &str = "Ada Lovelace";
/// Employee without a reference photo.
pub const NO_PHOTO_ID: &str = "64b7f0c2a1d3e4f5a6b7c8da";
/// Employee whose reference photo has no face.
pub const FACELESS_ID: &str = "64b7f0c2a1d3e4f5a6b7c8db";
/// Employee whose reference photo URL answers 500.
pub const BROKEN_PHOTO_ID: &str = "64b7f0c2a1d3e4f5a6b7c8dc";
/// Employee whose reference photo cannot be decoded.
pub const GARBLED_PHOTO_ID: &str = "64b7f0c2a1d3e4f5a6b7c8dd";
/// Well-formed id with no employee behind it.
pub const MISSING_ID: &str = "64b7f0c2a1d3e4f5a6b7c8ff";

// ---------------------------------------------------------------------------
// Fake object storage
// ---------------------------------------------------------------------------

/// Object storage that records every upload and deletion.
#[derive(Default)]
pub struct RecordingStorage {
    uploads: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
    fail_upload: bool,
    fail_destroy: bool,
}

impl RecordingStorage {
    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }

    pub fn failing_destroy() -> Self {
        Self {
            fail_destroy: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    /// Every created asset was deleted exactly once.
    pub fn assert_balanced(&self) {
        let destroyed = self.destroyed();
        assert_eq!(
            destroyed.len(),
            self.uploads(),
            "upload count must equal delete count, deleted: {destroyed:?}"
        );
        let mut unique = destroyed.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), destroyed.len(), "asset deleted twice");
    }
}

pub fn asset_url(n: usize) -> String {
    format!("https://res.cloudinary.test/demo/image/upload/asset-{n}.jpg")
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn upload(&self, _: &[u8], _: Option<&str>) -> Result<UploadedAsset, StorageError> {
        if self.fail_upload {
            return Err(StorageError::Api {
                status: 502,
                body: "bad gateway".into(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UploadedAsset {
            id: format!("asset-{n}"),
            secure_url: asset_url(n),
        })
    }

    async fn destroy(&self, asset_id: &str) -> Result<(), StorageError> {
        self.destroyed.lock().unwrap().push(asset_id.to_string());
        if self.fail_destroy {
            return Err(StorageError::Transport("connection reset".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fake face engine
// ---------------------------------------------------------------------------

/// Face engine keyed on exact image bytes, comparing with the real
/// distance rule.
pub struct FakeFaceEngine {
    encodings: HashMap<&'static [u8], Vec<FaceEncoding>>,
}

impl Default for FakeFaceEngine {
    fn default() -> Self {
        let ada = FaceEncoding::new(vec![0.10, 0.20, 0.30, 0.40]);
        let ada_reference = FaceEncoding::new(vec![0.12, 0.18, 0.31, 0.42]);
        let stranger = FaceEncoding::new(vec![0.90, -0.40, 0.75, -0.20]);

        let mut encodings = HashMap::new();
        encodings.insert(ADA_PHOTO, vec![ada.clone(), stranger.clone()]);
        encodings.insert(SLOW_PHOTO, vec![ada]);
        encodings.insert(STRANGER_PHOTO, vec![stranger]);
        encodings.insert(EMPTY_PHOTO, vec![]);
        encodings.insert(ADA_REFERENCE, vec![ada_reference]);
        encodings.insert(FACELESS_REFERENCE, vec![]);

        Self { encodings }
    }
}

#[async_trait]
impl FaceEngine for FakeFaceEngine {
    async fn detect_and_encode(&self, image: &[u8]) -> Result<Vec<FaceEncoding>, FaceEngineError> {
        if image == PANIC_PHOTO {
            panic!("encoder crashed");
        }
        if image == SLOW_PHOTO {
            tokio::time::sleep(SLOW_ENCODE_DELAY).await;
        }
        self.encodings
            .get(image)
            .cloned()
            .ok_or_else(|| FaceEngineError::Decode("unsupported image format".into()))
    }

    fn compare(&self, known: &FaceEncoding, candidate: &FaceEncoding) -> bool {
        is_match(known, candidate, DEFAULT_MATCH_TOLERANCE)
    }
}

// ---------------------------------------------------------------------------
// Fake employee store
// ---------------------------------------------------------------------------

/// Employee store backed by a map. Validates ids like the real store.
pub struct FakeEmployeeStore {
    employees: HashMap<String, EmployeeRecord>,
    failing: bool,
}

impl FakeEmployeeStore {
    /// Seed the standard employees, with photo URLs on `images`.
    pub fn seeded(images: &MockServer) -> Self {
        let record = |id: &str, name: &str, path: Option<&str>| EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            image_url: path.map(|p| images.url(p)),
        };

        let employees = [
            record(ADA_ID, ADA_NAME, Some("/ada.jpg")),
            record(NO_PHOTO_ID, "Charles Babbage", None),
            record(FACELESS_ID, "Grace Hopper", Some("/faceless.jpg")),
            record(BROKEN_PHOTO_ID, "Alan Turing", Some("/broken.jpg")),
            record(GARBLED_PHOTO_ID, "Edsger Dijkstra", Some("/garbled.jpg")),
        ]
        .into_iter()
        .map(|e| (e.id.clone(), e))
        .collect();

        Self {
            employees,
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            employees: HashMap::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl EmployeeStore for FakeEmployeeStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<EmployeeRecord>, EmployeeStoreError> {
        if self.failing {
            return Err(EmployeeStoreError::Query("connection refused".into()));
        }
        let id = EmployeeId::parse(id)?;
        Ok(self.employees.get(id.as_str()).cloned())
    }

    async fn health_check(&self) -> Result<(), EmployeeStoreError> {
        if self.failing {
            return Err(EmployeeStoreError::Query("connection refused".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub enum StoreMode {
    Seeded,
    Failing,
    Missing,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        outbound_timeout_secs: 5,
        face_engine_url: "http://127.0.0.1:1".to_string(),
        database_url: None,
        cloudinary: None,
    }
}

/// A running test application.
pub struct TestApp {
    pub router: Router,
    pub storage: Option<Arc<RecordingStorage>>,
    /// Hosts employee reference photos. Kept alive for the test's duration.
    pub images: MockServer,
}

/// Start the reference-photo server and build the app around the given
/// storage and employee store.
pub async fn spawn_app(storage: Option<RecordingStorage>, store: StoreMode) -> TestApp {
    spawn_app_with_config(test_config(), storage, store).await
}

/// Like [`spawn_app`], with a caller-supplied server configuration.
pub async fn spawn_app_with_config(
    config: ServerConfig,
    storage: Option<RecordingStorage>,
    store: StoreMode,
) -> TestApp {
    let images = MockServer::start_async().await;
    serve_reference(&images, "/ada.jpg", 200, ADA_REFERENCE).await;
    serve_reference(&images, "/faceless.jpg", 200, FACELESS_REFERENCE).await;
    serve_reference(&images, "/broken.jpg", 500, b"").await;
    serve_reference(&images, "/garbled.jpg", 200, GARBLED_REFERENCE).await;

    let storage = storage.map(Arc::new);
    let employees: Option<Arc<dyn EmployeeStore>> = match store {
        StoreMode::Seeded => Some(Arc::new(FakeEmployeeStore::seeded(&images))),
        StoreMode::Failing => Some(Arc::new(FakeEmployeeStore::failing())),
        StoreMode::Missing => None,
    };

    let state = AppState {
        storage: storage
            .clone()
            .map(|s| s as Arc<dyn ObjectStorage>),
        employees,
        face_engine: Arc::new(FakeFaceEngine::default()),
        reference_images: ReferenceImageFetcher::with_client(reqwest::Client::new()),
    };

    TestApp {
        router: build_app_router(state, &config),
        storage,
        images,
    }
}

/// The default app: working storage and seeded employees.
pub async fn default_app() -> TestApp {
    spawn_app(Some(RecordingStorage::default()), StoreMode::Seeded).await
}

async fn serve_reference(server: &MockServer, path: &str, status: u16, body: &[u8]) {
    let body = body.to_vec();
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(status).body(body);
        })
        .await;
}

impl TestApp {
    pub fn storage(&self) -> &RecordingStorage {
        self.storage.as_deref().expect("storage configured")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn recognize(&self, image: Option<&[u8]>, employee_id: Option<&str>) -> Response<Body> {
        self.send(recognize_request(image, employee_id)).await
    }
}

// ---------------------------------------------------------------------------
// Request / response helpers
// ---------------------------------------------------------------------------

pub const BOUNDARY: &str = "facegate-test-boundary";

/// Encode a multipart body from `(name, file_name, content)` parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recognize")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Build a `/recognize` request with the standard fields.
pub fn recognize_request(image: Option<&[u8]>, employee_id: Option<&str>) -> Request<Body> {
    let mut parts: Vec<(&str, Option<&str>, &[u8])> = Vec::new();
    if let Some(image) = image {
        parts.push(("image", Some("face.jpg"), image));
    }
    if let Some(employee_id) = employee_id {
        parts.push(("employeeId", None, employee_id.as_bytes()));
    }
    multipart_request(multipart_body(&parts))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
