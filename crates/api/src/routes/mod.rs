pub mod health;
pub mod recognize;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree.
///
/// ```text
/// /recognize                                       identify an uploaded photo (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(recognize::router())
}
