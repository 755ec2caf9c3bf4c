//! Cloudinary image API client.
//!
//! Implements [`ObjectStorage`] with signed `image/upload` and
//! `image/destroy` calls. Requests are signed by sorting the signed
//! parameters by name, joining them as `key=value` pairs with `&`, appending
//! the API secret and taking the SHA-256 hex digest.

use async_trait::async_trait;
use facegate_core::hashing::sha256_hex;
use facegate_core::storage::{ObjectStorage, StorageError, UploadedAsset};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Public Cloudinary API root.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// File name sent with uploads when the client did not provide one.
const FALLBACK_FILE_NAME: &str = "upload";

/// Digest used for request signatures.
const SIGNATURE_ALGORITHM: &str = "sha256";

/// Destroy results that mean the asset is gone.
const DESTROY_OK: &str = "ok";
const DESTROY_NOT_FOUND: &str = "not found";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Credentials and endpoint for a Cloudinary account.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// API root, overridable for testing (default: [`DEFAULT_API_BASE`]).
    pub api_base: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Load credentials from the environment.
    ///
    /// | Env Var                 | Default               |
    /// |-------------------------|-----------------------|
    /// | `CLOUDINARY_NAME`       | required              |
    /// | `CLOUDINARY_API_KEY`    | required              |
    /// | `CLOUDINARY_API_SECRET` | required              |
    /// | `CLOUDINARY_API_BASE`   | [`DEFAULT_API_BASE`]  |
    ///
    /// Returns `None` (and logs an error) if any credential is missing or
    /// blank, so the service can still start and report the problem per
    /// request.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        match (
            read("CLOUDINARY_NAME"),
            read("CLOUDINARY_API_KEY"),
            read("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(Self {
                cloud_name,
                api_key,
                api_secret,
                api_base: read("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
            }),
            _ => {
                tracing::error!(
                    "Missing Cloudinary credentials. Set CLOUDINARY_NAME, \
                     CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Compute the request signature for `params` with `api_secret`.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    sha256_hex(format!("{joined}{api_secret}").as_bytes())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// HTTP client for one Cloudinary account.
pub struct CloudinaryClient {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    /// Return the response unchanged on success, or a
    /// [`StorageError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StorageError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))
    }
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Transport(err.to_string())
}

#[async_trait]
impl ObjectStorage for CloudinaryClient {
    async fn upload(
        &self,
        image: &[u8],
        file_name: Option<&str>,
    ) -> Result<UploadedAsset, StorageError> {
        let timestamp = Self::timestamp();
        let signature = sign_params(&[("timestamp", timestamp.as_str())], &self.config.api_secret);

        let file = Part::bytes(image.to_vec())
            .file_name(file_name.unwrap_or(FALLBACK_FILE_NAME).to_string());
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let uploaded: UploadResponse = Self::parse_response(response).await?;
        tracing::debug!(
            asset_id = %uploaded.public_id,
            bytes = image.len(),
            "Uploaded image to Cloudinary"
        );

        Ok(UploadedAsset {
            id: uploaded.public_id,
            secure_url: uploaded.secure_url,
        })
    }

    async fn destroy(&self, asset_id: &str) -> Result<(), StorageError> {
        let timestamp = Self::timestamp();
        let signature = sign_params(
            &[("public_id", asset_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&[
                ("public_id", asset_id),
                ("api_key", self.config.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
                ("signature_algorithm", SIGNATURE_ALGORITHM),
            ])
            .send()
            .await
            .map_err(transport)?;

        let destroyed: DestroyResponse = Self::parse_response(response).await?;
        match destroyed.result.as_str() {
            DESTROY_OK | DESTROY_NOT_FOUND => Ok(()),
            other => Err(StorageError::InvalidResponse(format!(
                "destroy returned result '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
