//! Route definitions for the `/talent` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::talent;
use crate::state::AppState;

/// Routes mounted at `/talent`.
///
/// ```text
/// POST   /        -> create (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(talent::create))
}
