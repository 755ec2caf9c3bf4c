//! HTTP client for the face encoder service.
//!
//! The encoder exposes `POST /encode`, taking raw image bytes and answering
//! `{"encodings": [[f64, ...], ...]}` with one 128-d vector per detected face.
//! Comparison happens locally using Euclidean distance.

use std::io::Cursor;

use async_trait::async_trait;
use facegate_core::encoding::{is_match, FaceEncoding, DEFAULT_MATCH_TOLERANCE};
use facegate_core::face_engine::{FaceEngine, FaceEngineError};
use image::ImageReader;
use serde::Deserialize;

/// Default encoder root when `FACE_ENGINE_URL` is not set.
pub const DEFAULT_FACE_ENGINE_URL: &str = "http://127.0.0.1:5001";

#[derive(Debug, Deserialize)]
struct EncodeResponse {
    encodings: Vec<FaceEncoding>,
}

/// [`FaceEngine`] backed by a remote encoder.
pub struct HttpFaceEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFaceEngine {
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

/// Read just the image header to make sure the bytes are a supported image
/// (PNG, JPEG or WebP) before shipping them to the encoder.
pub fn probe_dimensions(image: &[u8]) -> Result<(u32, u32), FaceEngineError> {
    ImageReader::new(Cursor::new(image))
        .with_guessed_format()
        .map_err(|e| FaceEngineError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| FaceEngineError::Decode(e.to_string()))
}

#[async_trait]
impl FaceEngine for HttpFaceEngine {
    async fn detect_and_encode(&self, image: &[u8]) -> Result<Vec<FaceEncoding>, FaceEngineError> {
        let (width, height) = probe_dimensions(image)?;

        let response = self
            .client
            .post(format!("{}/encode", self.base_url.trim_end_matches('/')))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| FaceEngineError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FaceEngineError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let encoded: EncodeResponse = response
            .json()
            .await
            .map_err(|e| FaceEngineError::Transport(e.to_string()))?;

        tracing::debug!(width, height, faces = encoded.encodings.len(), "Encoded image");

        Ok(encoded.encodings)
    }

    fn compare(&self, known: &FaceEncoding, candidate: &FaceEncoding) -> bool {
        let matched = is_match(known, candidate, DEFAULT_MATCH_TOLERANCE);
        tracing::debug!(
            distance = ?known.distance(candidate),
            tolerance = DEFAULT_MATCH_TOLERANCE,
            matched,
            "Compared face encodings"
        );
        matched
    }
}
