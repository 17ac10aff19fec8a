//! Repository for the `project_locations` table.

use sqlx::PgPool;
use talentops_core::types::DbId;

use crate::models::location::{CreateProjectLocation, ProjectLocation};

const COLUMNS: &str = "id, project_id, name, is_default, created_at, updated_at";

/// Provides CRUD operations for project locations.
pub struct LocationRepo;

impl LocationRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProjectLocation,
    ) -> Result<ProjectLocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_locations (project_id, name, is_default)
             VALUES ($1, $2, COALESCE($3, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectLocation>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_locations
             WHERE project_id = $1
             ORDER BY is_default DESC, name"
        );
        sqlx::query_as::<_, ProjectLocation>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a location. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_locations WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
