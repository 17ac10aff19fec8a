//! Handlers for `/projects/{id}/talent-groups`.
//!
//! A group's `scheduled_dates` is never written directly: schedule changes
//! become daily rows (one per date and escort) and the array is re-derived.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use talentops_core::daily_assignment::{normalize_dates, ProjectWindow};
use talentops_core::error::CoreError;
use talentops_core::reconciler::replace_group_schedule;
use talentops_core::talent_group::{
    validate_group_name, validate_members, validate_phone, GroupMember,
};
use talentops_core::types::{Date, DbId};
use talentops_db::models::talent_group::{
    CreateTalentGroup, ReplaceGroupSchedule, TalentGroupDetail, UpdateTalentGroup,
};
use talentops_db::repositories::TalentGroupRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::project::{load_project, refresh_readiness};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validation(msg: String) -> AppError {
    AppError::Core(CoreError::Validation(msg))
}

fn check_members(members: &[GroupMember]) -> AppResult<()> {
    validate_members(members).map_err(validation)
}

fn check_phone(phone: Option<&str>) -> AppResult<()> {
    match phone {
        Some(p) if !p.trim().is_empty() => validate_phone(p).map_err(validation),
        _ => Ok(()),
    }
}

/// Reject a schedule that cannot be written before anything is stored.
fn check_schedule(window: &ProjectWindow, dates: &[Date], escort_ids: &[DbId]) -> AppResult<()> {
    for date in dates {
        window.check(*date)?;
    }
    if !dates.is_empty() && escort_ids.is_empty() {
        return Err(validation(
            "A group needs at least one escort before it can be scheduled".into(),
        ));
    }
    Ok(())
}

async fn load_detail(state: &AppState, project_id: DbId, id: DbId) -> AppResult<TalentGroupDetail> {
    TalentGroupRepo::find_detail(&state.pool, project_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TalentGroup",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/talent-groups
pub async fn list_by_project(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TalentGroupDetail>>>> {
    load_project(&state.pool, project_id).await?;
    let groups = TalentGroupRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/v1/projects/{id}/talent-groups/{group_id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, group_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<TalentGroupDetail>>> {
    let detail = load_detail(&state, project_id, group_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/projects/{id}/talent-groups
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateTalentGroup>,
) -> AppResult<(StatusCode, Json<DataResponse<TalentGroupDetail>>)> {
    let group_name = validate_group_name(&input.group_name).map_err(validation)?;
    check_members(&input.members)?;
    check_phone(input.point_of_contact_phone.as_deref())?;

    let project = load_project(&state.pool, project_id).await?;
    let window = project.window()?;
    let dates = normalize_dates(&input.scheduled_dates);
    check_schedule(&window, &dates, &input.escort_ids)?;

    let create = CreateTalentGroup {
        group_name,
        scheduled_dates: Vec::new(),
        ..input
    };
    let group = TalentGroupRepo::create(&state.pool, project_id, &create).await?;

    if !dates.is_empty() {
        replace_group_schedule(
            &state.assignment_store(),
            &window,
            group.id,
            project_id,
            &dates,
            &create.escort_ids,
        )
        .await?;
    }

    refresh_readiness(&state.pool, project_id).await?;
    let detail = load_detail(&state, project_id, group.id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        group_id = %group.id,
        members = detail.members.len(),
        days = detail.group.scheduled_dates.len(),
        "Talent group created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/projects/{id}/talent-groups/{group_id}
///
/// Changing the escorts or the dates rewrites the group's daily rows.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, group_id)): Path<(DbId, DbId)>,
    Json(mut input): Json<UpdateTalentGroup>,
) -> AppResult<Json<DataResponse<TalentGroupDetail>>> {
    if let Some(name) = input.group_name.take() {
        input.group_name = Some(validate_group_name(&name).map_err(validation)?);
    }
    if let Some(ref members) = input.members {
        check_members(members)?;
    }
    check_phone(input.point_of_contact_phone.as_deref())?;

    let project = load_project(&state.pool, project_id).await?;
    let window = project.window()?;
    let current = load_detail(&state, project_id, group_id).await?;

    let schedule_changed = input.scheduled_dates.is_some() || input.escort_ids.is_some();
    let dates = normalize_dates(
        input
            .scheduled_dates
            .as_deref()
            .unwrap_or(current.group.scheduled_dates.as_slice()),
    );
    let escort_ids = input
        .escort_ids
        .clone()
        .unwrap_or_else(|| current.escort_ids.clone());
    if schedule_changed {
        check_schedule(&window, &dates, &escort_ids)?;
    }

    TalentGroupRepo::update(&state.pool, project_id, group_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TalentGroup",
            id: group_id,
        }))?;

    if schedule_changed {
        replace_group_schedule(
            &state.assignment_store(),
            &window,
            group_id,
            project_id,
            &dates,
            &escort_ids,
        )
        .await?;
    }

    let detail = load_detail(&state, project_id, group_id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        group_id = %group_id,
        schedule_changed,
        "Talent group updated"
    );

    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/projects/{id}/talent-groups/{group_id}/schedule
pub async fn replace_schedule(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, group_id)): Path<(DbId, DbId)>,
    Json(input): Json<ReplaceGroupSchedule>,
) -> AppResult<Json<DataResponse<TalentGroupDetail>>> {
    let project = load_project(&state.pool, project_id).await?;
    let window = project.window()?;
    let current = load_detail(&state, project_id, group_id).await?;

    let dates = normalize_dates(&input.scheduled_dates);
    let escort_ids = input.escort_ids.clone().unwrap_or(current.escort_ids);
    check_schedule(&window, &dates, &escort_ids)?;

    if let Some(ref ids) = input.escort_ids {
        TalentGroupRepo::set_escorts(&state.pool, group_id, ids).await?;
    }

    let scheduled = replace_group_schedule(
        &state.assignment_store(),
        &window,
        group_id,
        project_id,
        &dates,
        &escort_ids,
    )
    .await?;

    let detail = load_detail(&state, project_id, group_id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        group_id = %group_id,
        days = scheduled.len(),
        escorts = escort_ids.len(),
        "Talent group schedule replaced"
    );

    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/projects/{id}/talent-groups/{group_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, group_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !TalentGroupRepo::delete(&state.pool, project_id, group_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TalentGroup",
            id: group_id,
        }));
    }
    refresh_readiness(&state.pool, project_id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %project_id,
        group_id = %group_id,
        "Talent group deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
