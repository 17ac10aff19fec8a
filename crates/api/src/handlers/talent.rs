//! Handlers for talent records and their project assignments.
//!
//! Daily rows are the source of truth for a talent's schedule; every write
//! here goes through the reconciler so `scheduled_dates` is re-derived.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use talentops_core::daily_assignment::{normalize_dates, AssignmentEntity, DailyRow};
use talentops_core::error::CoreError;
use talentops_core::reconciler::{assign_day, unassign_day};
use talentops_core::types::{Date, DbId};
use talentops_db::models::talent::{CreateTalent, CreateTalentAssignment, Talent, TalentAssignment};
use talentops_db::repositories::{TalentAssignmentRepo, TalentRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::{load_project, refresh_readiness};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PUT /projects/{id}/talent/{talent_id}/days/{date}`.
#[derive(Debug, Deserialize)]
pub struct AssignDayRequest {
    pub escort_id: DbId,
}

/// A talent's schedule after a day was assigned or cleared.
#[derive(Debug, Serialize)]
pub struct DaySchedule {
    pub talent_id: DbId,
    /// Rows removed by an unassign; zero for assigns.
    pub removed: usize,
    pub scheduled_dates: Vec<Date>,
}

async fn load_assignment(
    state: &AppState,
    project_id: DbId,
    talent_id: DbId,
) -> AppResult<TalentAssignment> {
    TalentAssignmentRepo::find(&state.pool, project_id, talent_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TalentAssignment",
            id: talent_id,
        }))
}

// ---------------------------------------------------------------------------
// Talent records
// ---------------------------------------------------------------------------

/// POST /api/v1/talent
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTalent>,
) -> AppResult<(StatusCode, Json<DataResponse<Talent>>)> {
    input.first_name = input.first_name.trim().to_string();
    input.last_name = input.last_name.trim().to_string();
    if input.first_name.is_empty() && input.last_name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Talent needs a first or last name".into(),
        )));
    }

    let talent = TalentRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = %admin.user_id, talent_id = %talent.id, "Talent created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: talent })))
}

// ---------------------------------------------------------------------------
// Project assignments
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/talent
pub async fn list_by_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TalentAssignment>>>> {
    load_project(&state.pool, project_id).await?;
    let assignments = TalentAssignmentRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: assignments }))
}

/// POST /api/v1/projects/{id}/talent
///
/// Any `scheduled_dates` are written as daily rows for the given escort, so
/// a schedule without an escort is refused.
pub async fn assign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTalentAssignment>,
) -> AppResult<(StatusCode, Json<DataResponse<TalentAssignment>>)> {
    let project = load_project(&state.pool, project_id).await?;
    let window = project.window()?;

    let dates = normalize_dates(&input.scheduled_dates);
    for date in &dates {
        window.check(*date)?;
    }
    if !dates.is_empty() && input.escort_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Talent needs an escort before it can be scheduled".into(),
        )));
    }

    let create = CreateTalentAssignment {
        scheduled_dates: Vec::new(),
        ..input
    };
    let assignment = TalentAssignmentRepo::create(&state.pool, project_id, &create).await?;

    if let Some(escort_id) = create.escort_id {
        let store = state.assignment_store();
        for date in &dates {
            let row = DailyRow {
                entity: AssignmentEntity::Talent(create.talent_id),
                project_id,
                assignment_date: *date,
                escort_id,
            };
            assign_day(&store, &window, &row).await?;
        }
    }

    refresh_readiness(&state.pool, project_id).await?;
    let assignment = load_assignment(&state, project_id, assignment.talent_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        talent_id = %assignment.talent_id,
        days = assignment.scheduled_dates.len(),
        "Talent assigned to project"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// DELETE /api/v1/projects/{id}/talent/{talent_id}
pub async fn unassign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((project_id, talent_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !TalentAssignmentRepo::delete(&state.pool, project_id, talent_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TalentAssignment",
            id: talent_id,
        }));
    }
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %admin.user_id,
        project_id = %project_id,
        talent_id = %talent_id,
        "Talent removed from project"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Daily assignments
// ---------------------------------------------------------------------------

/// PUT /api/v1/projects/{id}/talent/{talent_id}/days/{date}
///
/// Replaces whichever escort the talent had on that date.
pub async fn assign_escort_day(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, talent_id, date)): Path<(DbId, DbId, Date)>,
    Json(input): Json<AssignDayRequest>,
) -> AppResult<Json<DataResponse<DaySchedule>>> {
    let project = load_project(&state.pool, project_id).await?;
    let window = project.window()?;
    load_assignment(&state, project_id, talent_id).await?;

    let row = DailyRow {
        entity: AssignmentEntity::Talent(talent_id),
        project_id,
        assignment_date: date,
        escort_id: input.escort_id,
    };
    let scheduled_dates = assign_day(&state.assignment_store(), &window, &row).await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        talent_id = %talent_id,
        escort_id = %input.escort_id,
        %date,
        "Escort assigned for day"
    );

    Ok(Json(DataResponse {
        data: DaySchedule {
            talent_id,
            removed: 0,
            scheduled_dates,
        },
    }))
}

/// DELETE /api/v1/projects/{id}/talent/{talent_id}/days/{date}
pub async fn unassign_escort_day(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, talent_id, date)): Path<(DbId, DbId, Date)>,
) -> AppResult<Json<DataResponse<DaySchedule>>> {
    load_assignment(&state, project_id, talent_id).await?;

    let (removed, scheduled_dates) = unassign_day(
        &state.assignment_store(),
        AssignmentEntity::Talent(talent_id),
        project_id,
        date,
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        talent_id = %talent_id,
        %date,
        removed,
        "Escort unassigned for day"
    );

    Ok(Json(DataResponse {
        data: DaySchedule {
            talent_id,
            removed,
            scheduled_dates,
        },
    }))
}
