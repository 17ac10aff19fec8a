//! Repository for the `talent_daily_assignments` and
//! `group_daily_assignments` tables.
//!
//! Writes are upserts keyed on each table's natural uniqueness constraint,
//! so replaying the same rows is harmless.

use sqlx::PgPool;
use talentops_core::types::{Date, DbId};

use crate::models::daily_assignment::{GroupDailyAssignment, TalentDailyAssignment};

const TALENT_COLUMNS: &str =
    "id, talent_id, project_id, assignment_date, escort_id, created_at, updated_at";

const GROUP_COLUMNS: &str =
    "id, group_id, project_id, assignment_date, escort_id, created_at, updated_at";

/// Provides data access for daily escort assignments.
pub struct DailyAssignmentRepo;

impl DailyAssignmentRepo {
    // -----------------------------------------------------------------------
    // Talent
    // -----------------------------------------------------------------------

    /// Set the escort of a talent on a date, replacing any previous escort.
    ///
    /// Returns `None` when the talent already has a row on that date in a
    /// different project; that row is left alone.
    pub async fn upsert_talent_day(
        pool: &PgPool,
        talent_id: DbId,
        project_id: DbId,
        date: Date,
        escort_id: DbId,
    ) -> Result<Option<TalentDailyAssignment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO talent_daily_assignments
                (talent_id, project_id, assignment_date, escort_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (talent_id, assignment_date) DO UPDATE SET
                escort_id = EXCLUDED.escort_id
             WHERE talent_daily_assignments.project_id = EXCLUDED.project_id
             RETURNING {TALENT_COLUMNS}"
        );
        sqlx::query_as::<_, TalentDailyAssignment>(&query)
            .bind(talent_id)
            .bind(project_id)
            .bind(date)
            .bind(escort_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_talent_days(
        pool: &PgPool,
        talent_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<TalentDailyAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {TALENT_COLUMNS} FROM talent_daily_assignments
             WHERE talent_id = $1 AND project_id = $2
             ORDER BY assignment_date"
        );
        sqlx::query_as::<_, TalentDailyAssignment>(&query)
            .bind(talent_id)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a talent's row on a date. Returns `true` if a row was deleted.
    pub async fn delete_talent_day(
        pool: &PgPool,
        talent_id: DbId,
        project_id: DbId,
        date: Date,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM talent_daily_assignments
             WHERE talent_id = $1 AND project_id = $2 AND assignment_date = $3",
        )
        .bind(talent_id)
        .bind(project_id)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    /// Add an escort to a group on a date. Existing rows are left in place.
    pub async fn upsert_group_day(
        pool: &PgPool,
        group_id: DbId,
        project_id: DbId,
        date: Date,
        escort_id: DbId,
    ) -> Result<GroupDailyAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO group_daily_assignments
                (group_id, project_id, assignment_date, escort_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (group_id, assignment_date, escort_id) DO UPDATE SET
                project_id = EXCLUDED.project_id
             RETURNING {GROUP_COLUMNS}"
        );
        sqlx::query_as::<_, GroupDailyAssignment>(&query)
            .bind(group_id)
            .bind(project_id)
            .bind(date)
            .bind(escort_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_group_days(
        pool: &PgPool,
        group_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<GroupDailyAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM group_daily_assignments
             WHERE group_id = $1 AND project_id = $2
             ORDER BY assignment_date, escort_id"
        );
        sqlx::query_as::<_, GroupDailyAssignment>(&query)
            .bind(group_id)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete one (group, date, escort) row.
    pub async fn delete_group_day(
        pool: &PgPool,
        group_id: DbId,
        project_id: DbId,
        date: Date,
        escort_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM group_daily_assignments
             WHERE group_id = $1 AND project_id = $2
               AND assignment_date = $3 AND escort_id = $4",
        )
        .bind(group_id)
        .bind(project_id)
        .bind(date)
        .bind(escort_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Project-wide
    // -----------------------------------------------------------------------

    /// Delete every daily row of a project, talent and group alike.
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let talent = sqlx::query("DELETE FROM talent_daily_assignments WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
        let groups = sqlx::query("DELETE FROM group_daily_assignments WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(talent.rows_affected() + groups.rows_affected())
    }

    /// Number of daily rows in a project.
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (Option<i64>,) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM talent_daily_assignments WHERE project_id = $1)
              + (SELECT COUNT(*) FROM group_daily_assignments WHERE project_id = $1)",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0.unwrap_or(0))
    }
}
