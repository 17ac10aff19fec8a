//! Handlers for `/projects/{id}/team`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use talentops_core::error::CoreError;
use talentops_core::roles::{normalize_role_name, validate_team_role};
use talentops_core::timecard::validate_pay_rate;
use talentops_core::types::DbId;
use talentops_db::models::team::{CreateTeamAssignment, TeamAssignment, TeamMember};
use talentops_db::repositories::TeamRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::{load_project, refresh_readiness};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/team
pub async fn list_by_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    load_project(&state.pool, project_id).await?;
    let members = TeamRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/projects/{id}/team
pub async fn add(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateTeamAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<TeamAssignment>>)> {
    let role = normalize_role_name(&input.role).unwrap_or(input.role.as_str());
    validate_team_role(role).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    input.role = role.to_string();

    if let Some(rate) = input.pay_rate {
        validate_pay_rate(rate).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    load_project(&state.pool, project_id).await?;
    let assignment = TeamRepo::create(&state.pool, project_id, &input).await?;
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        member_id = %assignment.user_id,
        role = %assignment.role,
        "Team member added"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// DELETE /api/v1/projects/{id}/team/{user_id}
pub async fn remove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !TeamRepo::delete(&state.pool, project_id, member_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TeamAssignment",
            id: member_id,
        }));
    }
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        member_id = %member_id,
        "Team member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
