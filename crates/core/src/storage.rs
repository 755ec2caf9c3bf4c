//! Object-storage capability used to host uploaded images.
//!
//! Implemented by `facegate_cloud::cloudinary::CloudinaryClient`.

use async_trait::async_trait;

/// A remote object created from an upload.
///
/// Whoever receives an `UploadedAsset` owns it and must hand it back to
/// [`ObjectStorage::release`] before finishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Provider-assigned identifier used for deletion.
    pub id: String,
    /// HTTPS delivery URL for the stored object.
    pub secure_url: String,
}

/// Errors from an object-storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The request never produced a response (network, DNS, TLS, timeout).
    #[error("storage request failed: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("storage API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider answered 2xx but the payload was not what we expected.
    #[error("unexpected storage response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `image` and return the created asset.
    async fn upload(
        &self,
        image: &[u8],
        file_name: Option<&str>,
    ) -> Result<UploadedAsset, StorageError>;

    /// Delete the asset with the given id. Deleting an asset that no longer
    /// exists succeeds.
    async fn destroy(&self, asset_id: &str) -> Result<(), StorageError>;

    /// Fire-and-forget deletion used on cleanup paths.
    ///
    /// Failures are logged and swallowed so they never mask the response
    /// already decided by the caller.
    async fn release(&self, asset: &UploadedAsset) {
        match self.destroy(&asset.id).await {
            Ok(()) => {
                tracing::debug!(asset_id = %asset.id, "Released uploaded asset");
            }
            Err(e) => {
                tracing::warn!(
                    asset_id = %asset.id,
                    error = %e,
                    "Failed to release uploaded asset"
                );
            }
        }
    }
}
