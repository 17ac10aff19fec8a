//! One-shot operations run by the worker CLI.
//!
//! Each command returns `Ok(true)` on full success and `Ok(false)` when the
//! run completed but some item failed or a check found a mismatch.

use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use talentops_core::reconciler::{migrate_project, rollback_project, verify_project};
use talentops_core::throttle::TokenBucket;
use talentops_core::types::DbId;
use talentops_db::models::project::Project;
use talentops_db::repositories::{ProjectRepo, ReadinessRepo, TimecardRepo};
use talentops_db::{DbPool, PgAssignmentStore};
use uuid::Uuid;

use crate::config::WorkerConfig;
use crate::throttle::ThrottledStore;

async fn load_project(pool: &DbPool, project_id: DbId) -> anyhow::Result<Project> {
    ProjectRepo::find_by_id(pool, project_id)
        .await
        .context("Failed to load project")?
        .with_context(|| format!("Project {project_id} not found"))
}

async fn project_ids(pool: &DbPool, project_id: Option<DbId>) -> anyhow::Result<Vec<DbId>> {
    match project_id {
        Some(id) => Ok(vec![load_project(pool, id).await?.id]),
        None => ProjectRepo::list_ids(pool)
            .await
            .context("Failed to list projects"),
    }
}

fn print_json<T: Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{label}:\n{json}"),
        Err(e) => tracing::warn!(error = %e, "Failed to render summary"),
    }
}

// ---------------------------------------------------------------------------
// Daily assignments
// ---------------------------------------------------------------------------

/// Expand a project's period-level assignments into daily rows.
pub async fn migrate_daily_assignments(
    pool: &DbPool,
    config: &WorkerConfig,
    project_id: DbId,
) -> anyhow::Result<bool> {
    let project = load_project(pool, project_id).await?;
    let window = project.window()?;

    let bucket = TokenBucket::for_batches(config.batch_size, config.batch_pause(), Instant::now());
    let store = ThrottledStore::new(PgAssignmentStore::new(pool.clone()), bucket);
    let run_id = Uuid::now_v7();

    tracing::info!(
        %project_id,
        %run_id,
        batch_size = config.batch_size,
        pause_ms = config.batch_pause_ms,
        "Migrating daily assignments"
    );

    let summary = migrate_project(&store, &window, project_id, run_id).await?;

    tracing::info!(
        %project_id,
        assignments = summary.assignments,
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        rejected = summary.rejected.len(),
        snapshot_taken = summary.snapshot_taken,
        "Migration finished"
    );
    for failure in &summary.failures {
        tracing::warn!(
            entity = ?failure.entity,
            date = ?failure.date,
            error = %failure.error,
            "Daily assignment write failed"
        );
    }

    print_json("Migration summary", &summary);
    if let Some(hint) = summary.remediation() {
        println!("\n{hint}");
    }

    Ok(!summary.has_failures())
}

/// Delete a project's daily rows and restore the saved schedules.
pub async fn rollback_daily_assignments(pool: &DbPool, project_id: DbId) -> anyhow::Result<bool> {
    load_project(pool, project_id).await?;
    let store = PgAssignmentStore::new(pool.clone());

    let summary = rollback_project(&store, project_id).await?;

    if summary.already_rolled_back {
        tracing::info!(%project_id, "No pending migration backup; nothing to roll back");
    } else {
        tracing::info!(
            %project_id,
            rows_deleted = summary.rows_deleted,
            schedules_restored = summary.schedules_restored,
            "Rollback finished"
        );
    }

    print_json("Rollback summary", &summary);
    Ok(true)
}

/// Compare stored schedules with their daily rows.
pub async fn verify_daily_assignments(pool: &DbPool, project_id: DbId) -> anyhow::Result<bool> {
    load_project(pool, project_id).await?;
    let store = PgAssignmentStore::new(pool.clone());

    let mismatches = verify_project(&store, project_id).await?;

    if mismatches.is_empty() {
        tracing::info!(%project_id, "All schedules match their daily rows");
        println!("All schedules match their daily rows.");
        return Ok(true);
    }

    tracing::warn!(%project_id, mismatches = mismatches.len(), "Schedule mismatches found");
    print_json("Mismatches", &mismatches);
    println!(
        "\nRe-run migrate-daily-assignments to resync schedules from the daily rows, \
         or rollback-daily-assignments to restore the saved schedules."
    );
    Ok(false)
}

// ---------------------------------------------------------------------------
// Recomputation
// ---------------------------------------------------------------------------

/// Recompute readiness for one project or every project.
pub async fn recompute_readiness(pool: &DbPool, project_id: Option<DbId>) -> anyhow::Result<bool> {
    let ids = project_ids(pool, project_id).await?;
    let mut failed = 0usize;

    for id in &ids {
        match ReadinessRepo::recompute(pool, *id).await {
            Ok(readiness) => tracing::info!(
                project_id = %id,
                overall_status = %readiness.overall_status,
                "Readiness recomputed"
            ),
            Err(e) => {
                failed += 1;
                tracing::error!(project_id = %id, error = %e, "Readiness recompute failed");
            }
        }
    }

    println!("Recomputed readiness for {} of {} projects.", ids.len() - failed, ids.len());
    Ok(failed == 0)
}

/// Recompute daily figures and totals of every timecard in scope.
pub async fn recompute_timecard_totals(
    pool: &DbPool,
    project_id: Option<DbId>,
) -> anyhow::Result<bool> {
    if let Some(id) = project_id {
        load_project(pool, id).await?;
    }
    let ids = TimecardRepo::list_ids(pool, project_id)
        .await
        .context("Failed to list timecards")?;
    let mut failed = 0usize;

    for id in &ids {
        match TimecardRepo::recalculate(pool, *id).await {
            Ok(Some(totals)) => tracing::debug!(
                timecard_id = %id,
                total_hours = totals.total_hours,
                total_pay = totals.total_pay,
                "Timecard totals recomputed"
            ),
            Ok(None) => tracing::warn!(timecard_id = %id, "Timecard vanished during recompute"),
            Err(e) => {
                failed += 1;
                tracing::error!(timecard_id = %id, error = %e, "Timecard recompute failed");
            }
        }
    }

    tracing::info!(timecards = ids.len(), failed, "Timecard recompute finished");
    println!("Recomputed totals for {} of {} timecards.", ids.len() - failed, ids.len());
    Ok(failed == 0)
}
