//! Handlers for `/projects/{id}/readiness`.

use axum::extract::{Path, State};
use axum::Json;
use talentops_core::error::CoreError;
use talentops_core::readiness::validate_area;
use talentops_core::types::DbId;
use talentops_db::models::readiness::{FinalizeArea, ProjectReadiness};
use talentops_db::repositories::ReadinessRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::{load_project, refresh_readiness};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/readiness
///
/// Always recomputed from current counts before it is returned.
pub async fn get(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectReadiness>>> {
    load_project(&state.pool, project_id).await?;
    let readiness = refresh_readiness(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: readiness }))
}

/// POST /api/v1/projects/{id}/readiness/finalize
///
/// Marks an area finalized, or un-finalizes it with `"finalized": false`.
pub async fn finalize(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<FinalizeArea>,
) -> AppResult<Json<DataResponse<ProjectReadiness>>> {
    let area = validate_area(&input.area).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    let finalized = input.finalized.unwrap_or(true);

    load_project(&state.pool, project_id).await?;
    let readiness = ReadinessRepo::set_finalized(&state.pool, project_id, area, finalized).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        area = area.as_str(),
        finalized,
        overall_status = %readiness.overall_status,
        "Readiness area finalize flag set"
    );

    Ok(Json(DataResponse { data: readiness }))
}
