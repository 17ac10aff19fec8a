//! Repository for the `project_role_templates` table.

use sqlx::PgPool;
use talentops_core::types::DbId;

use crate::models::role_template::{CreateRoleTemplate, ProjectRoleTemplate};

const COLUMNS: &str =
    "id, project_id, role, display_name, base_pay_rate, is_default, created_at, updated_at";

/// Provides CRUD operations for project role templates.
pub struct RoleTemplateRepo;

impl RoleTemplateRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateRoleTemplate,
    ) -> Result<ProjectRoleTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_role_templates
                (project_id, role, display_name, base_pay_rate, is_default)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRoleTemplate>(&query)
            .bind(project_id)
            .bind(&input.role)
            .bind(&input.display_name)
            .bind(input.base_pay_rate)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectRoleTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_role_templates
             WHERE project_id = $1
             ORDER BY role, display_name"
        );
        sqlx::query_as::<_, ProjectRoleTemplate>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM project_role_templates WHERE id = $1 AND project_id = $2")
                .bind(id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
