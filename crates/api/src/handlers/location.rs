//! Handlers for `/projects/{id}/locations`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use talentops_core::error::CoreError;
use talentops_core::types::DbId;
use talentops_db::models::location::{CreateProjectLocation, ProjectLocation};
use talentops_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::{load_project, refresh_readiness};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/locations
pub async fn list_by_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectLocation>>>> {
    load_project(&state.pool, project_id).await?;
    let locations = LocationRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/projects/{id}/locations
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateProjectLocation>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectLocation>>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Location name must not be empty".into(),
        )));
    }
    input.name = name.to_string();

    load_project(&state.pool, project_id).await?;
    let location = LocationRepo::create(&state.pool, project_id, &input).await?;
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        location_id = %location.id,
        "Location created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// DELETE /api/v1/projects/{id}/locations/{location_id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, location_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !LocationRepo::delete(&state.pool, project_id, location_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectLocation",
            id: location_id,
        }));
    }
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        location_id = %location_id,
        "Location deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
