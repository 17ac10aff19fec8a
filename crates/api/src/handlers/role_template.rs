//! Handlers for `/projects/{id}/roles`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use talentops_core::error::CoreError;
use talentops_core::roles::normalize_role_name;
use talentops_core::timecard::validate_pay_rate;
use talentops_core::types::DbId;
use talentops_db::models::role_template::{CreateRoleTemplate, ProjectRoleTemplate};
use talentops_db::repositories::RoleTemplateRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::{load_project, refresh_readiness};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/roles
pub async fn list_by_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectRoleTemplate>>>> {
    load_project(&state.pool, project_id).await?;
    let roles = RoleTemplateRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: roles }))
}

/// POST /api/v1/projects/{id}/roles
///
/// Legacy role labels are accepted and stored under their canonical name.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<CreateRoleTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRoleTemplate>>)> {
    let role = normalize_role_name(&input.role).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown role '{}'",
            input.role
        )))
    })?;
    input.role = role.to_string();

    let display_name = input.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Display name must not be empty".into(),
        )));
    }
    input.display_name = display_name.to_string();

    if let Some(rate) = input.base_pay_rate {
        validate_pay_rate(rate).map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    }

    load_project(&state.pool, project_id).await?;
    let template = RoleTemplateRepo::create(&state.pool, project_id, &input).await?;
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        role = %template.role,
        "Role template created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// DELETE /api/v1/projects/{id}/roles/{role_id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, role_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !RoleTemplateRepo::delete(&state.pool, project_id, role_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "ProjectRoleTemplate",
            id: role_id,
        }));
    }
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        role_id = %role_id,
        "Role template deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
