//! Daily assignment reconciliation, direct assignment, and rollback.
//!
//! All persistence goes through [`AssignmentStore`], so the same orchestration
//! runs against Postgres (`talentops_db::PgAssignmentStore`), a throttled
//! wrapper in the worker, or an in-memory store in tests.
//!
//! Batch operations never abort on a single failed row: the failure is
//! recorded in the returned summary and processing continues. Single-request
//! operations (assign a day, replace a group schedule) propagate the first
//! error instead.

use async_trait::async_trait;
use serde::Serialize;

use crate::daily_assignment::{
    derive_scheduled_dates, find_schedule_mismatch, plan_daily_rows, plan_group_schedule,
    AssignmentEntity, DailyRow, PeriodAssignment, ProjectWindow, RejectedDate, ScheduleMismatch,
};
use crate::error::CoreResult;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// A saved copy of an entity's `scheduled_dates` taken before migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSnapshot {
    pub entity: AssignmentEntity,
    pub project_id: DbId,
    /// Stored exactly as it was, including order and duplicates.
    pub scheduled_dates: Vec<Date>,
}

/// Persistence operations needed by the reconciler.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Period-level assignments (talent and groups) of a project.
    async fn period_assignments(&self, project_id: DbId) -> CoreResult<Vec<PeriodAssignment>>;

    /// Current daily rows of one entity within a project.
    async fn list_days(
        &self,
        entity: AssignmentEntity,
        project_id: DbId,
    ) -> CoreResult<Vec<DailyRow>>;

    /// Insert a daily row, or update it in place on the natural key.
    async fn upsert_day(&self, row: &DailyRow) -> CoreResult<()>;

    /// Delete one daily row. Returns `true` if it existed.
    async fn delete_day(&self, row: &DailyRow) -> CoreResult<bool>;

    /// Overwrite the parent's `scheduled_dates`.
    async fn write_scheduled_dates(
        &self,
        entity: AssignmentEntity,
        project_id: DbId,
        dates: &[Date],
    ) -> CoreResult<()>;

    /// Delete every daily row (talent and group) of a project.
    async fn delete_project_days(&self, project_id: DbId) -> CoreResult<u64>;

    /// Snapshots of the project that have not been restored yet.
    async fn pending_snapshots(&self, project_id: DbId) -> CoreResult<Vec<ScheduleSnapshot>>;

    /// Persist snapshots under a migration run id.
    async fn save_snapshots(
        &self,
        run_id: DbId,
        project_id: DbId,
        snapshots: &[ScheduleSnapshot],
    ) -> CoreResult<()>;

    /// Mark all pending snapshots of the project restored.
    async fn mark_snapshots_restored(&self, project_id: DbId) -> CoreResult<u64>;
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// A row or schedule write that failed during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub entity: AssignmentEntity,
    /// `None` when the schedule sync itself failed.
    pub date: Option<Date>,
    pub escort_id: Option<DbId>,
    pub error: String,
}

/// Outcome of a reconciliation batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileSummary {
    /// Period-level assignments examined.
    pub assignments: usize,
    /// Assignments with no escort (nothing to expand).
    pub skipped: usize,
    /// Daily rows written.
    pub succeeded: usize,
    /// Row or schedule writes that failed.
    pub failed: usize,
    /// Parents whose `scheduled_dates` were recomputed.
    pub schedules_synced: usize,
    /// Parents left untouched because a row failed or a date was rejected.
    /// Their `scheduled_dates` still hold the full schedule for a re-run.
    pub schedules_deferred: usize,
    pub rejected: Vec<RejectedDate>,
    pub failures: Vec<ItemFailure>,
    /// Whether this run saved the pre-migration backup.
    pub snapshot_taken: bool,
}

impl ReconcileSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Manual follow-up to print after the run, if any is needed.
    pub fn remediation(&self) -> Option<&'static str> {
        if self.failed > 0 {
            Some(
                "Some rows failed. Check the error messages, fix the data, and re-run; \
                 completed rows are upserted and will not duplicate, and affected schedules \
                 were left unchanged. To undo the migration, run rollback-daily-assignments.",
            )
        } else if !self.rejected.is_empty() {
            Some(
                "Some scheduled dates fall outside the project range and were not migrated. \
                 Their schedules were left unchanged. \
                 Adjust the project dates or the schedule, then re-run.",
            )
        } else {
            None
        }
    }
}

/// Outcome of a rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RollbackSummary {
    pub rows_deleted: u64,
    pub schedules_restored: usize,
    /// No pending snapshot existed, so nothing was touched.
    pub already_rolled_back: bool,
}

// ---------------------------------------------------------------------------
// Schedule sync
// ---------------------------------------------------------------------------

/// Recompute an entity's `scheduled_dates` from its daily rows.
pub async fn sync_schedule<S: AssignmentStore + ?Sized>(
    store: &S,
    entity: AssignmentEntity,
    project_id: DbId,
) -> CoreResult<Vec<Date>> {
    let rows = store.list_days(entity, project_id).await?;
    let dates = derive_scheduled_dates(&rows);
    store
        .write_scheduled_dates(entity, project_id, &dates)
        .await?;
    Ok(dates)
}

// ---------------------------------------------------------------------------
// Batch reconciliation
// ---------------------------------------------------------------------------

/// Expand period-level assignments into daily rows and resync schedules.
///
/// Never fails as a whole; every error is recorded in the summary. A parent
/// is resynced only when all of its rows were written and none of its dates
/// were rejected, so failed and rejected dates stay in `scheduled_dates`
/// until a later run migrates them.
pub async fn reconcile_assignments<S: AssignmentStore + ?Sized>(
    store: &S,
    window: &ProjectWindow,
    assignments: &[PeriodAssignment],
) -> ReconcileSummary {
    let mut summary = ReconcileSummary {
        assignments: assignments.len(),
        ..Default::default()
    };

    for assignment in assignments {
        if assignment.escort_ids.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let plan = plan_daily_rows(assignment, window);
        let mut clean = plan.rejected.is_empty();
        summary.rejected.extend(plan.rejected);

        for row in &plan.rows {
            match store.upsert_day(row).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    clean = false;
                    summary.failed += 1;
                    summary.failures.push(ItemFailure {
                        entity: row.entity,
                        date: Some(row.assignment_date),
                        escort_id: Some(row.escort_id),
                        error: e.to_string(),
                    });
                }
            }
        }

        if !clean {
            summary.schedules_deferred += 1;
            continue;
        }

        match sync_schedule(store, assignment.entity, assignment.project_id).await {
            Ok(_) => summary.schedules_synced += 1,
            Err(e) => {
                summary.failed += 1;
                summary.failures.push(ItemFailure {
                    entity: assignment.entity,
                    date: None,
                    escort_id: None,
                    error: e.to_string(),
                });
            }
        }
    }

    summary
}

/// Migrate a whole project to daily rows.
///
/// Saves a backup of every `scheduled_dates` array first, unless an earlier
/// run already left one pending; the oldest pre-migration state is the one
/// rollback restores.
pub async fn migrate_project<S: AssignmentStore + ?Sized>(
    store: &S,
    window: &ProjectWindow,
    project_id: DbId,
    run_id: DbId,
) -> CoreResult<ReconcileSummary> {
    let assignments = store.period_assignments(project_id).await?;

    let pending = store.pending_snapshots(project_id).await?;
    let snapshot_taken = if pending.is_empty() {
        let snapshots: Vec<ScheduleSnapshot> = assignments
            .iter()
            .map(|a| ScheduleSnapshot {
                entity: a.entity,
                project_id,
                scheduled_dates: a.scheduled_dates.clone(),
            })
            .collect();
        store.save_snapshots(run_id, project_id, &snapshots).await?;
        true
    } else {
        false
    };

    let mut summary = reconcile_assignments(store, window, &assignments).await;
    summary.snapshot_taken = snapshot_taken;
    Ok(summary)
}

/// Undo a migration: drop all daily rows and restore the saved schedules.
///
/// Safe to re-run. Without a pending snapshot nothing is changed.
pub async fn rollback_project<S: AssignmentStore + ?Sized>(
    store: &S,
    project_id: DbId,
) -> CoreResult<RollbackSummary> {
    let pending = store.pending_snapshots(project_id).await?;
    if pending.is_empty() {
        return Ok(RollbackSummary {
            already_rolled_back: true,
            ..Default::default()
        });
    }

    let rows_deleted = store.delete_project_days(project_id).await?;

    for snapshot in &pending {
        store
            .write_scheduled_dates(snapshot.entity, project_id, &snapshot.scheduled_dates)
            .await?;
    }

    store.mark_snapshots_restored(project_id).await?;

    Ok(RollbackSummary {
        rows_deleted,
        schedules_restored: pending.len(),
        already_rolled_back: false,
    })
}

/// Report every entity whose stored schedule disagrees with its rows.
pub async fn verify_project<S: AssignmentStore + ?Sized>(
    store: &S,
    project_id: DbId,
) -> CoreResult<Vec<ScheduleMismatch>> {
    let assignments = store.period_assignments(project_id).await?;
    let mut mismatches = Vec::new();

    for assignment in &assignments {
        let rows = store.list_days(assignment.entity, project_id).await?;
        if let Some(m) = find_schedule_mismatch(assignment.entity, &assignment.scheduled_dates, &rows)
        {
            mismatches.push(m);
        }
    }

    Ok(mismatches)
}

// ---------------------------------------------------------------------------
// Direct assignment
// ---------------------------------------------------------------------------

/// Assign an escort to an entity for one date. Returns the new schedule.
pub async fn assign_day<S: AssignmentStore + ?Sized>(
    store: &S,
    window: &ProjectWindow,
    row: &DailyRow,
) -> CoreResult<Vec<Date>> {
    window.check(row.assignment_date)?;
    store.upsert_day(row).await?;
    sync_schedule(store, row.entity, row.project_id).await
}

/// Remove every row of an entity on one date. Returns `(removed, schedule)`.
pub async fn unassign_day<S: AssignmentStore + ?Sized>(
    store: &S,
    entity: AssignmentEntity,
    project_id: DbId,
    date: Date,
) -> CoreResult<(usize, Vec<Date>)> {
    let rows = store.list_days(entity, project_id).await?;
    let mut removed = 0;
    for row in rows.iter().filter(|r| r.assignment_date == date) {
        if store.delete_day(row).await? {
            removed += 1;
        }
    }
    let dates = sync_schedule(store, entity, project_id).await?;
    Ok((removed, dates))
}

/// Replace a group's schedule with `dates` staffed by `escort_ids`.
pub async fn replace_group_schedule<S: AssignmentStore + ?Sized>(
    store: &S,
    window: &ProjectWindow,
    group_id: DbId,
    project_id: DbId,
    dates: &[Date],
    escort_ids: &[DbId],
) -> CoreResult<Vec<Date>> {
    let entity = AssignmentEntity::Group(group_id);
    let existing = store.list_days(entity, project_id).await?;
    let plan = plan_group_schedule(group_id, project_id, window, dates, escort_ids, &existing)?;

    for row in &plan.to_delete {
        store.delete_day(row).await?;
    }
    for row in &plan.to_upsert {
        store.upsert_day(row).await?;
    }

    sync_schedule(store, entity, project_id).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
