//! Face detection/encoding capability.
//!
//! Implemented by `facegate_cloud::face_engine::HttpFaceEngine`.

use async_trait::async_trait;

use crate::encoding::FaceEncoding;

/// Errors from a face engine.
#[derive(Debug, thiserror::Error)]
pub enum FaceEngineError {
    /// The input bytes are not a decodable image.
    #[error("cannot decode image: {0}")]
    Decode(String),

    /// The engine could not be reached.
    #[error("face engine request failed: {0}")]
    Transport(String),

    /// The engine answered with a non-2xx status.
    #[error("face engine error ({status}): {body}")]
    Api { status: u16, body: String },
}

#[async_trait]
pub trait FaceEngine: Send + Sync {
    /// Detect every face in `image` and return one encoding per face, in the
    /// engine's detection order. An image without faces yields an empty list.
    async fn detect_and_encode(&self, image: &[u8]) -> Result<Vec<FaceEncoding>, FaceEngineError>;

    /// Whether `candidate` depicts the same person as `known`.
    fn compare(&self, known: &FaceEncoding, candidate: &FaceEncoding) -> bool;
}
