pub mod health;
pub mod project;
pub mod talent;
pub mod timecard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                          create
/// /projects/{id}                                     get
/// /projects/{id}/locations                           list, create
/// /projects/{id}/roles                               list, create
/// /projects/{id}/team                                list, add
/// /projects/{id}/talent                              list, assign
/// /projects/{id}/talent/{talent_id}/days/{date}      assign, unassign escort
/// /projects/{id}/talent-groups                       list, create
/// /projects/{id}/talent-groups/{group_id}            get, update, delete
/// /projects/{id}/talent-groups/{group_id}/schedule   replace schedule
/// /projects/{id}/readiness                           recompute + get
/// /projects/{id}/readiness/finalize                  finalize area (admin)
///
/// /talent                                            create (admin)
///
/// /timecards                                         create
/// /timecards/edit                                    audited edit
/// /timecards/{id}                                    get
/// /timecards/{id}/entries/{date}                     upsert, delete
/// /timecards/{id}/submit|approve|reject|return-to-draft
/// /timecards/{id}/audit                              audit trail
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/talent", talent::router())
        .nest("/timecards", timecard::router())
}
