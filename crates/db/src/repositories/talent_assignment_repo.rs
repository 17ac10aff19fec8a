//! Repository for the `talent_project_assignments` table.

use sqlx::PgPool;
use talentops_core::types::{Date, DbId};

use crate::models::talent::{CreateTalentAssignment, TalentAssignment};

/// Column list for talent_project_assignments queries.
const COLUMNS: &str = "id, talent_id, project_id, escort_id, scheduled_dates, status, \
    created_at, updated_at";

/// Provides data access for period-level talent assignments.
pub struct TalentAssignmentRepo;

impl TalentAssignmentRepo {
    /// Assign talent to a project.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTalentAssignment,
    ) -> Result<TalentAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO talent_project_assignments
                (talent_id, project_id, escort_id, scheduled_dates)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TalentAssignment>(&query)
            .bind(input.talent_id)
            .bind(project_id)
            .bind(input.escort_id)
            .bind(&input.scheduled_dates)
            .fetch_one(pool)
            .await
    }

    /// The assignment of one talent on one project.
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        talent_id: DbId,
    ) -> Result<Option<TalentAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_project_assignments
             WHERE project_id = $1 AND talent_id = $2"
        );
        sqlx::query_as::<_, TalentAssignment>(&query)
            .bind(project_id)
            .bind(talent_id)
            .fetch_optional(pool)
            .await
    }

    /// All talent assignments of a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TalentAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_project_assignments
             WHERE project_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, TalentAssignment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the stored schedule.
    pub async fn set_scheduled_dates(
        pool: &PgPool,
        project_id: DbId,
        talent_id: DbId,
        dates: &[Date],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE talent_project_assignments SET scheduled_dates = $3
             WHERE project_id = $1 AND talent_id = $2",
        )
        .bind(project_id)
        .bind(talent_id)
        .bind(dates)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove talent from a project along with their daily rows there.
    pub async fn delete(
        pool: &PgPool,
        project_id: DbId,
        talent_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "DELETE FROM talent_daily_assignments WHERE project_id = $1 AND talent_id = $2",
        )
        .bind(project_id)
        .bind(talent_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "DELETE FROM talent_project_assignments WHERE project_id = $1 AND talent_id = $2",
        )
        .bind(project_id)
        .bind(talent_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
