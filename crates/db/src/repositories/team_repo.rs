//! Repository for the `team_assignments` table.

use sqlx::PgPool;
use talentops_core::types::DbId;

use crate::models::team::{CreateTeamAssignment, TeamAssignment, TeamMember};

/// Column list for team_assignments queries.
const COLUMNS: &str = "id, project_id, user_id, role, pay_rate, created_at, updated_at";

/// Provides data access for project staff.
pub struct TeamRepo;

impl TeamRepo {
    /// Add a staff member to a project. The role must already be canonical.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTeamAssignment,
    ) -> Result<TeamAssignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO team_assignments (project_id, user_id, role, pay_rate)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TeamAssignment>(&query)
            .bind(project_id)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(input.pay_rate)
            .fetch_one(pool)
            .await
    }

    /// List a project's staff with their names.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TeamMember>, sqlx::Error> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT ta.id, ta.project_id, ta.user_id, p.full_name, p.email, ta.role, ta.pay_rate
             FROM team_assignments ta
             JOIN profiles p ON p.id = ta.user_id
             WHERE ta.project_id = $1
             ORDER BY p.full_name, ta.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// The team assignment of one user on one project.
    pub async fn find_for_user(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<TeamAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM team_assignments
             WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, TeamAssignment>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Remove a user from a project's staff. Returns `true` if a row was deleted.
    pub async fn delete(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM team_assignments WHERE user_id = $1 AND project_id = $2")
                .bind(user_id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
