//! Handlers for the `/timecards` resource.
//!
//! Owners write entries while a timecard is a draft. After review starts,
//! changes go through `POST /timecards/edit`, which audits every changed
//! field under a shared change id.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;
use talentops_core::error::CoreError;
use talentops_core::timecard::{
    build_audit_entries, diff_times, plan_edit, validate_pay_rate, validate_period,
    validate_transition, validate_work_date, AuditContext, AuditEntry, DailyTimes, EditAction,
    TimecardStatus,
};
use talentops_core::types::{Date, DbId};
use talentops_db::models::timecard::{
    CreateTimecard, EditResult, EditTimecard, TimecardAuditRow, TimecardDailyEntry,
    TimecardHeader, TimecardWithEntries,
};
use talentops_db::repositories::{TeamRepo, TimecardAuditRepo, TimecardRepo};
use talentops_db::repositories::timecard_repo::EditedDay;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::project::load_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /timecards/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectTimecard {
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

async fn load_header(pool: &PgPool, id: DbId) -> AppResult<TimecardHeader> {
    TimecardRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timecard",
            id,
        }))
}

async fn load_with_entries(pool: &PgPool, id: DbId) -> AppResult<TimecardWithEntries> {
    TimecardRepo::find_with_entries(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Timecard",
            id,
        }))
}

fn status_of(header: &TimecardHeader) -> AppResult<TimecardStatus> {
    TimecardStatus::from_str_value(&header.status)
        .map_err(|e| AppError::Core(CoreError::Internal(e)))
}

fn ensure_owner(auth: &AuthUser, header: &TimecardHeader) -> AppResult<()> {
    if header.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the timecard owner may do this".into(),
        )));
    }
    Ok(())
}

fn ensure_owner_or_admin(auth: &AuthUser, header: &TimecardHeader) -> AppResult<()> {
    if auth.is_admin() {
        return Ok(());
    }
    ensure_owner(auth, header)
}

/// Owner-only entry writes, allowed while the timecard is open for editing.
fn ensure_entry_writable(
    auth: &AuthUser,
    header: &TimecardHeader,
    work_date: Date,
) -> AppResult<()> {
    ensure_owner(auth, header)?;
    let status = status_of(header)?;
    if !status.accepts_entry_writes() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Entries cannot be changed while the timecard is {}",
            status.as_str()
        ))));
    }
    validate_work_date(header.period_start_date, header.period_end_date, work_date)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))
}

/// Move a timecard to `to`, guarding against a concurrent status change.
async fn apply_transition(
    pool: &PgPool,
    header: &TimecardHeader,
    to: TimecardStatus,
    actor: DbId,
    reason: Option<&str>,
) -> AppResult<TimecardHeader> {
    let from = status_of(header)?;
    validate_transition(from, to)?;

    let updated = TimecardRepo::transition(pool, header.id, from, to, actor, reason)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Timecard status changed concurrently; reload and retry".into(),
            ))
        })?;

    tracing::info!(
        user_id = %actor,
        timecard_id = %header.id,
        from = from.as_str(),
        to = to.as_str(),
        "Timecard status changed"
    );

    Ok(updated)
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// POST /api/v1/timecards
///
/// Without an explicit rate the owner's team pay rate applies, else zero.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTimecard>,
) -> AppResult<(StatusCode, Json<DataResponse<TimecardHeader>>)> {
    validate_period(input.period_start_date, input.period_end_date)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
    load_project(&state.pool, input.project_id).await?;

    let pay_rate = match input.pay_rate {
        Some(rate) => rate,
        None => TeamRepo::find_for_user(&state.pool, input.project_id, auth.user_id)
            .await?
            .and_then(|t| t.pay_rate)
            .unwrap_or(0.0),
    };
    validate_pay_rate(pay_rate).map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let header = TimecardRepo::create(&state.pool, auth.user_id, &input, pay_rate).await?;

    tracing::info!(
        user_id = %auth.user_id,
        project_id = %input.project_id,
        timecard_id = %header.id,
        pay_rate,
        "Timecard created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: header })))
}

/// GET /api/v1/timecards/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimecardWithEntries>>> {
    let timecard = load_with_entries(&state.pool, id).await?;
    ensure_owner_or_admin(&auth, &timecard.header)?;
    Ok(Json(DataResponse { data: timecard }))
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// PUT /api/v1/timecards/{id}/entries/{date}
pub async fn upsert_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, work_date)): Path<(DbId, Date)>,
    Json(times): Json<DailyTimes>,
) -> AppResult<Json<DataResponse<TimecardDailyEntry>>> {
    let header = load_header(&state.pool, id).await?;
    ensure_entry_writable(&auth, &header, work_date)?;

    let entry = TimecardRepo::upsert_entry(&state.pool, &header, work_date, &times).await?;

    tracing::info!(
        user_id = %auth.user_id,
        timecard_id = %id,
        %work_date,
        hours_worked = entry.hours_worked,
        "Timecard entry saved"
    );

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/timecards/{id}/entries/{date}
pub async fn delete_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, work_date)): Path<(DbId, Date)>,
) -> AppResult<StatusCode> {
    let header = load_header(&state.pool, id).await?;
    ensure_entry_writable(&auth, &header, work_date)?;

    if !TimecardRepo::delete_entry(&state.pool, id, work_date).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "TimecardDailyEntry",
            id,
        }));
    }

    tracing::info!(user_id = %auth.user_id, timecard_id = %id, %work_date, "Timecard entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/timecards/{id}/submit
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimecardHeader>>> {
    let header = load_header(&state.pool, id).await?;
    ensure_owner(&auth, &header)?;
    let updated = apply_transition(
        &state.pool,
        &header,
        TimecardStatus::Submitted,
        auth.user_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/timecards/{id}/approve
pub async fn approve(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimecardHeader>>> {
    let header = load_header(&state.pool, id).await?;
    let updated = apply_transition(
        &state.pool,
        &header,
        TimecardStatus::Approved,
        admin.user_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/timecards/{id}/reject
pub async fn reject(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectTimecard>,
) -> AppResult<Json<DataResponse<TimecardHeader>>> {
    let reason = input.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "A rejection reason is required".into(),
        )));
    }

    let header = load_header(&state.pool, id).await?;
    let updated = apply_transition(
        &state.pool,
        &header,
        TimecardStatus::Rejected,
        admin.user_id,
        Some(reason),
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/timecards/{id}/return-to-draft
pub async fn return_to_draft(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimecardHeader>>> {
    let header = load_header(&state.pool, id).await?;
    let updated = apply_transition(
        &state.pool,
        &header,
        TimecardStatus::Draft,
        admin.user_id,
        None,
    )
    .await?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Audited edits
// ---------------------------------------------------------------------------

/// POST /api/v1/timecards/edit
///
/// Applies field changes to one or more days. Only fields whose value
/// actually changes are written to the audit log, and every row of one
/// request shares a `change_id`.
pub async fn edit(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EditTimecard>,
) -> AppResult<Json<DataResponse<EditResult>>> {
    let action = EditAction::from_str_value(&input.action_type)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let header = load_header(&state.pool, input.timecard_id).await?;
    if action.requires_admin() {
        if !auth.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "{} requires the admin role",
                action.as_str()
            ))));
        }
    } else {
        ensure_owner(&auth, &header)?;
    }

    let status = status_of(&header)?;
    let outcome = plan_edit(action, status)?;

    let reason = input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    if action == EditAction::RejectionEdit && reason.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "A reason is required when rejecting with edits".into(),
        )));
    }
    if input.days.is_empty() && action != EditAction::RejectionEdit {
        return Err(AppError::Core(CoreError::Validation(
            "An edit must change at least one day".into(),
        )));
    }

    let mut seen = HashSet::new();
    for day in &input.days {
        validate_work_date(header.period_start_date, header.period_end_date, day.work_date)
            .map_err(|e| AppError::Core(CoreError::Validation(e)))?;
        if !seen.insert(day.work_date) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Work date {} appears more than once",
                day.work_date
            ))));
        }
    }

    let ctx = AuditContext {
        timecard_id: header.id,
        change_id: Uuid::new_v4(),
        changed_by: auth.user_id,
        changed_at: chrono::Utc::now(),
        action,
    };

    let mut edited: Vec<EditedDay> = Vec::new();
    let mut audit: Vec<AuditEntry> = Vec::new();
    for day in &input.days {
        let old = TimecardRepo::find_entry(&state.pool, header.id, day.work_date)
            .await?
            .map(|e| e.times())
            .unwrap_or_default();
        let new = day.times.apply(&old);
        let changes = diff_times(&old, &new);
        if changes.is_empty() {
            continue;
        }
        if outcome.audited {
            audit.extend(build_audit_entries(&ctx, day.work_date, &changes));
        }
        edited.push(EditedDay {
            work_date: day.work_date,
            times: new,
        });
    }

    let rejection_reason = if action == EditAction::RejectionEdit {
        reason
    } else {
        None
    };

    TimecardRepo::apply_edit(
        &state.pool,
        &header,
        status,
        outcome.next_status,
        &edited,
        &audit,
        rejection_reason,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Timecard status changed concurrently; reload and retry".into(),
        ))
    })?;

    let timecard = load_with_entries(&state.pool, header.id).await?;

    tracing::info!(
        user_id = %auth.user_id,
        timecard_id = %header.id,
        action = action.as_str(),
        days_changed = edited.len(),
        audit_rows = audit.len(),
        status = %timecard.header.status,
        "Timecard edited"
    );

    Ok(Json(DataResponse {
        data: EditResult {
            timecard,
            change_id: (!audit.is_empty()).then_some(ctx.change_id),
            audit_rows: audit.len(),
        },
    }))
}

/// GET /api/v1/timecards/{id}/audit
pub async fn audit_trail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TimecardAuditRow>>>> {
    let header = load_header(&state.pool, id).await?;
    ensure_owner_or_admin(&auth, &header)?;
    let rows = TimecardAuditRepo::list_by_timecard(&state.pool, id).await?;
    Ok(Json(DataResponse { data: rows }))
}
