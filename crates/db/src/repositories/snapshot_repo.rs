//! Repository for the `schedule_snapshots` table.

use sqlx::PgPool;
use talentops_core::types::{Date, DbId};

use crate::models::snapshot::ScheduleSnapshotRow;

const COLUMNS: &str = "id, run_id, project_id, entity_type, entity_id, scheduled_dates, \
    restored_at, created_at, updated_at";

/// Provides data access for pre-migration schedule backups.
pub struct SnapshotRepo;

impl SnapshotRepo {
    /// Save a batch of snapshots in one transaction.
    ///
    /// An entity that already has a pending snapshot keeps it.
    pub async fn insert_many(
        pool: &PgPool,
        run_id: DbId,
        project_id: DbId,
        entries: &[(&str, DbId, &[Date])],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut inserted = 0;

        for (entity_type, entity_id, dates) in entries {
            let result = sqlx::query(
                "INSERT INTO schedule_snapshots
                    (run_id, project_id, entity_type, entity_id, scheduled_dates)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (project_id, entity_type, entity_id)
                    WHERE restored_at IS NULL
                 DO NOTHING",
            )
            .bind(run_id)
            .bind(project_id)
            .bind(*entity_type)
            .bind(*entity_id)
            .bind(*dates)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Snapshots of a project that have not been restored.
    pub async fn list_pending(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ScheduleSnapshotRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_snapshots
             WHERE project_id = $1 AND restored_at IS NULL
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ScheduleSnapshotRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Mark every pending snapshot of a project restored.
    pub async fn mark_restored(pool: &PgPool, project_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE schedule_snapshots SET restored_at = NOW()
             WHERE project_id = $1 AND restored_at IS NULL",
        )
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
