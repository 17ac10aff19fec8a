//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;
use talentops_core::daily_assignment::ProjectWindow;
use talentops_core::error::CoreError;
use talentops_core::types::DbId;
use talentops_db::models::project::{CreateProject, Project};
use talentops_db::models::readiness::ProjectReadiness;
use talentops_db::repositories::{ProjectRepo, ReadinessRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a project, returning NotFound if it does not exist.
pub(crate) async fn load_project(pool: &PgPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Recompute a project's readiness after one of its inputs changed.
pub(crate) async fn refresh_readiness(
    pool: &PgPool,
    project_id: DbId,
) -> AppResult<ProjectReadiness> {
    let readiness = ReadinessRepo::recompute(pool, project_id).await?;
    tracing::debug!(
        project_id = %project_id,
        overall_status = %readiness.overall_status,
        "Readiness recomputed"
    );
    Ok(readiness)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }
    ProjectWindow::new(input.start_date, input.end_date)?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    refresh_readiness(&state.pool, project.id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project.id,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = load_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: project }))
}
