//! Route definitions for the `/projects` resource and everything scoped
//! to a project.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{location, project, readiness, role_template, talent, talent_group, team};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                                             -> create (admin)
/// GET    /{id}                                         -> get_by_id
///
/// GET    /{id}/locations                               -> list_by_project
/// POST   /{id}/locations                               -> create (admin)
/// DELETE /{id}/locations/{location_id}                 -> delete (admin)
///
/// GET    /{id}/roles                                   -> list_by_project
/// POST   /{id}/roles                                   -> create (admin)
/// DELETE /{id}/roles/{role_id}                         -> delete (admin)
///
/// GET    /{id}/team                                    -> list_by_project
/// POST   /{id}/team                                    -> add (admin)
/// DELETE /{id}/team/{user_id}                          -> remove (admin)
///
/// GET    /{id}/talent                                  -> list_by_project
/// POST   /{id}/talent                                  -> assign (admin)
/// DELETE /{id}/talent/{talent_id}                      -> unassign (admin)
/// PUT    /{id}/talent/{talent_id}/days/{date}          -> assign_escort_day
/// DELETE /{id}/talent/{talent_id}/days/{date}          -> unassign_escort_day
///
/// GET    /{id}/talent-groups                           -> list_by_project
/// POST   /{id}/talent-groups                           -> create
/// GET    /{id}/talent-groups/{group_id}                -> get_by_id
/// PUT    /{id}/talent-groups/{group_id}                -> update
/// DELETE /{id}/talent-groups/{group_id}                -> delete
/// PUT    /{id}/talent-groups/{group_id}/schedule       -> replace_schedule
///
/// GET    /{id}/readiness                               -> get
/// POST   /{id}/readiness/finalize                      -> finalize (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route("/{id}", get(project::get_by_id))
        // Locations.
        .route(
            "/{id}/locations",
            get(location::list_by_project).post(location::create),
        )
        .route("/{id}/locations/{location_id}", delete(location::delete))
        // Role templates.
        .route(
            "/{id}/roles",
            get(role_template::list_by_project).post(role_template::create),
        )
        .route("/{id}/roles/{role_id}", delete(role_template::delete))
        // Team.
        .route("/{id}/team", get(team::list_by_project).post(team::add))
        .route("/{id}/team/{user_id}", delete(team::remove))
        // Talent.
        .route(
            "/{id}/talent",
            get(talent::list_by_project).post(talent::assign),
        )
        .route("/{id}/talent/{talent_id}", delete(talent::unassign))
        .route(
            "/{id}/talent/{talent_id}/days/{date}",
            put(talent::assign_escort_day).delete(talent::unassign_escort_day),
        )
        // Talent groups.
        .route(
            "/{id}/talent-groups",
            get(talent_group::list_by_project).post(talent_group::create),
        )
        .route(
            "/{id}/talent-groups/{group_id}",
            get(talent_group::get_by_id)
                .put(talent_group::update)
                .delete(talent_group::delete),
        )
        .route(
            "/{id}/talent-groups/{group_id}/schedule",
            put(talent_group::replace_schedule),
        )
        // Readiness.
        .route("/{id}/readiness", get(readiness::get))
        .route("/{id}/readiness/finalize", post(readiness::finalize))
}
