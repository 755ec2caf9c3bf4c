//! Download of employee reference photos.

/// Reference photos larger than this are rejected.
pub const MAX_REFERENCE_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Error type for reference photo downloads.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed (network, DNS, timeout, invalid URL).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host answered with a non-2xx status.
    #[error("image host returned HTTP {0}")]
    HttpStatus(u16),

    #[error("reference image is {0} bytes, over the {MAX_REFERENCE_IMAGE_BYTES} byte limit")]
    TooLarge(usize),
}

/// Fetches reference photos over HTTP(S).
#[derive(Clone)]
pub struct ReferenceImageFetcher {
    client: reqwest::Client,
}

impl ReferenceImageFetcher {
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Download the image at `url`.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_REFERENCE_IMAGE_BYTES {
                return Err(FetchError::TooLarge(len as usize));
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_REFERENCE_IMAGE_BYTES {
            return Err(FetchError::TooLarge(bytes.len()));
        }

        Ok(bytes.to_vec())
    }
}
