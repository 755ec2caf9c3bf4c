//! Clients for the third-party services FaceGate depends on.
//!
//! - [`cloudinary`]: signed upload/destroy against the Cloudinary image API.
//! - [`face_engine`]: remote face encoder with local distance comparison.
//! - [`fetch`]: download of employee reference photos.

pub mod cloudinary;
pub mod face_engine;
pub mod fetch;

use std::time::Duration;

/// Build a [`reqwest::Client`] whose every request is bounded by `timeout`.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(concat!("facegate/", env!("CARGO_PKG_VERSION")))
        .build()
}
