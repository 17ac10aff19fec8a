//! Repository for the `project_readiness` table.
//!
//! The record is always recomputed from fresh counts; nothing patches the
//! stored statuses incrementally.

use sqlx::PgPool;
use talentops_core::readiness::{
    evaluate_readiness, ReadinessArea, ReadinessCounts, ReadinessFlags,
};
use talentops_core::roles::ROLE_TALENT_ESCORT;
use talentops_core::types::DbId;

use crate::models::readiness::ProjectReadiness;

/// Column list for project_readiness queries.
const COLUMNS: &str = "project_id, custom_location_count, custom_role_count, \
    total_staff_count, escort_count, total_talent_count, locations_status, roles_status, \
    team_status, talent_status, locations_finalized, roles_finalized, team_finalized, \
    talent_finalized, overall_status, last_updated";

/// Provides data access for project readiness.
pub struct ReadinessRepo;

impl ReadinessRepo {
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<ProjectReadiness>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_readiness WHERE project_id = $1");
        sqlx::query_as::<_, ProjectReadiness>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Count everything readiness depends on.
    ///
    /// Talent counts individual assignments plus groups.
    pub async fn load_counts(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<ReadinessCounts, sqlx::Error> {
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM project_locations
                  WHERE project_id = $1 AND NOT is_default),
                (SELECT COUNT(*) FROM project_role_templates
                  WHERE project_id = $1 AND NOT is_default),
                (SELECT COUNT(*) FROM team_assignments WHERE project_id = $1),
                (SELECT COUNT(*) FROM team_assignments
                  WHERE project_id = $1 AND role = $2),
                (SELECT COUNT(*) FROM talent_project_assignments WHERE project_id = $1)
              + (SELECT COUNT(*) FROM talent_groups WHERE project_id = $1)",
        )
        .bind(project_id)
        .bind(ROLE_TALENT_ESCORT)
        .fetch_one(pool)
        .await?;

        Ok(ReadinessCounts {
            custom_location_count: row.0,
            custom_role_count: row.1,
            total_staff_count: row.2,
            escort_count: row.3,
            total_talent_count: row.4,
        })
    }

    /// Recompute and store the readiness record, keeping the finalize flags.
    pub async fn recompute(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<ProjectReadiness, sqlx::Error> {
        let flags = Self::find(pool, project_id)
            .await?
            .map(|r| r.flags())
            .unwrap_or_default();
        Self::store(pool, project_id, &flags).await
    }

    /// Set one area's finalize flag, then recompute.
    pub async fn set_finalized(
        pool: &PgPool,
        project_id: DbId,
        area: ReadinessArea,
        finalized: bool,
    ) -> Result<ProjectReadiness, sqlx::Error> {
        let mut flags = Self::find(pool, project_id)
            .await?
            .map(|r| r.flags())
            .unwrap_or_default();
        flags.set(area, finalized);
        Self::store(pool, project_id, &flags).await
    }

    async fn store(
        pool: &PgPool,
        project_id: DbId,
        flags: &ReadinessFlags,
    ) -> Result<ProjectReadiness, sqlx::Error> {
        let counts = Self::load_counts(pool, project_id).await?;
        let eval = evaluate_readiness(&counts, flags);

        let query = format!(
            "INSERT INTO project_readiness
                (project_id, custom_location_count, custom_role_count, total_staff_count,
                 escort_count, total_talent_count, locations_status, roles_status,
                 team_status, talent_status, locations_finalized, roles_finalized,
                 team_finalized, talent_finalized, overall_status, last_updated)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, NOW())
             ON CONFLICT (project_id) DO UPDATE SET
                custom_location_count = EXCLUDED.custom_location_count,
                custom_role_count = EXCLUDED.custom_role_count,
                total_staff_count = EXCLUDED.total_staff_count,
                escort_count = EXCLUDED.escort_count,
                total_talent_count = EXCLUDED.total_talent_count,
                locations_status = EXCLUDED.locations_status,
                roles_status = EXCLUDED.roles_status,
                team_status = EXCLUDED.team_status,
                talent_status = EXCLUDED.talent_status,
                locations_finalized = EXCLUDED.locations_finalized,
                roles_finalized = EXCLUDED.roles_finalized,
                team_finalized = EXCLUDED.team_finalized,
                talent_finalized = EXCLUDED.talent_finalized,
                overall_status = EXCLUDED.overall_status,
                last_updated = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectReadiness>(&query)
            .bind(project_id)
            .bind(counts.custom_location_count)
            .bind(counts.custom_role_count)
            .bind(counts.total_staff_count)
            .bind(counts.escort_count)
            .bind(counts.total_talent_count)
            .bind(eval.locations_status.as_str())
            .bind(eval.roles_status.as_str())
            .bind(eval.team_status.as_str())
            .bind(eval.talent_status.as_str())
            .bind(flags.locations_finalized)
            .bind(flags.roles_finalized)
            .bind(flags.team_finalized)
            .bind(flags.talent_finalized)
            .bind(eval.overall_status.as_str())
            .fetch_one(pool)
            .await
    }
}
