use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Largest accepted request body, multipart framing included.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Mount the recognition endpoint.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recognize", post(handlers::recognize::recognize))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
