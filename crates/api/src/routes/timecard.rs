//! Route definitions for the `/timecards` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::timecard;
use crate::state::AppState;

/// Routes mounted at `/timecards`.
///
/// ```text
/// POST   /                          -> create
/// POST   /edit                      -> edit (audited)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}/entries/{date}       -> upsert_entry
/// DELETE /{id}/entries/{date}       -> delete_entry
/// POST   /{id}/submit               -> submit
/// POST   /{id}/approve              -> approve (admin)
/// POST   /{id}/reject               -> reject (admin)
/// POST   /{id}/return-to-draft      -> return_to_draft (admin)
/// GET    /{id}/audit                -> audit_trail
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(timecard::create))
        .route("/edit", post(timecard::edit))
        .route("/{id}", get(timecard::get_by_id))
        .route(
            "/{id}/entries/{date}",
            put(timecard::upsert_entry).delete(timecard::delete_entry),
        )
        .route("/{id}/submit", post(timecard::submit))
        .route("/{id}/approve", post(timecard::approve))
        .route("/{id}/reject", post(timecard::reject))
        .route("/{id}/return-to-draft", post(timecard::return_to_draft))
        .route("/{id}/audit", get(timecard::audit_trail))
}
