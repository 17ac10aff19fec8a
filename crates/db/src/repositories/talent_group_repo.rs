//! Repository for the `talent_groups` table and its child tables
//! `talent_group_members` and `talent_group_escorts`.

use sqlx::PgPool;
use talentops_core::talent_group::GroupMember;
use talentops_core::types::{Date, DbId};

use crate::models::talent_group::{
    CreateTalentGroup, TalentGroup, TalentGroupDetail, TalentGroupMember, UpdateTalentGroup,
};

/// Column list for the `talent_groups` table.
const COLUMNS: &str = "id, project_id, group_name, scheduled_dates, point_of_contact_name, \
    point_of_contact_phone, created_at, updated_at";

const MEMBER_COLUMNS: &str = "id, group_id, first_name, last_name, role, sort_order";

/// Provides CRUD operations for talent groups and their members and escorts.
pub struct TalentGroupRepo;

impl TalentGroupRepo {
    /// Insert a group with its members and escorts in one transaction.
    ///
    /// `scheduled_dates` is stored as given; callers sync it from daily rows
    /// once those are written.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTalentGroup,
    ) -> Result<TalentGroup, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO talent_groups
                (project_id, group_name, scheduled_dates, point_of_contact_name,
                 point_of_contact_phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let group = sqlx::query_as::<_, TalentGroup>(&query)
            .bind(project_id)
            .bind(&input.group_name)
            .bind(&input.scheduled_dates)
            .bind(&input.point_of_contact_name)
            .bind(&input.point_of_contact_phone)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_members_inner(&mut tx, group.id, &input.members).await?;
        Self::set_escorts_inner(&mut tx, group.id, &input.escort_ids).await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Find a group within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<TalentGroup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_groups WHERE id = $1 AND project_id = $2"
        );
        sqlx::query_as::<_, TalentGroup>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a group with its members and escorts.
    pub async fn find_detail(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<TalentGroupDetail>, sqlx::Error> {
        match Self::find_by_id(pool, project_id, id).await? {
            Some(group) => Ok(Some(Self::detail_for(pool, group).await?)),
            None => Ok(None),
        }
    }

    /// List a project's groups with members and escorts.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TalentGroupDetail>, sqlx::Error> {
        let groups = Self::list_groups(pool, project_id).await?;
        let mut result = Vec::with_capacity(groups.len());
        for group in groups {
            result.push(Self::detail_for(pool, group).await?);
        }
        Ok(result)
    }

    /// List a project's group rows only.
    pub async fn list_groups(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TalentGroup>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_groups
             WHERE project_id = $1
             ORDER BY group_name, id"
        );
        sqlx::query_as::<_, TalentGroup>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a group. Only non-`None` fields are applied; present member or
    /// escort lists replace the stored ones.
    ///
    /// `scheduled_dates` is not written here; it is derived from daily rows.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        input: &UpdateTalentGroup,
    ) -> Result<Option<TalentGroup>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE talent_groups SET
                group_name = COALESCE($3, group_name),
                point_of_contact_name = COALESCE($4, point_of_contact_name),
                point_of_contact_phone = COALESCE($5, point_of_contact_phone)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let group = sqlx::query_as::<_, TalentGroup>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.group_name)
            .bind(&input.point_of_contact_name)
            .bind(&input.point_of_contact_phone)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref group) = group {
            if let Some(ref members) = input.members {
                Self::set_members_inner(&mut tx, group.id, members).await?;
            }
            if let Some(ref escort_ids) = input.escort_ids {
                Self::set_escorts_inner(&mut tx, group.id, escort_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(group)
    }

    /// Delete a group. Children and daily rows cascade.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM talent_groups WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the stored schedule.
    pub async fn set_scheduled_dates(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        dates: &[Date],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE talent_groups SET scheduled_dates = $3 WHERE id = $1 AND project_id = $2",
        )
        .bind(id)
        .bind(project_id)
        .bind(dates)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a group's escorts.
    pub async fn set_escorts(
        pool: &PgPool,
        group_id: DbId,
        escort_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::set_escorts_inner(&mut tx, group_id, escort_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Child collection helpers
    // -----------------------------------------------------------------------

    pub async fn list_members(
        pool: &PgPool,
        group_id: DbId,
    ) -> Result<Vec<TalentGroupMember>, sqlx::Error> {
        let query = format!(
            "SELECT {MEMBER_COLUMNS} FROM talent_group_members
             WHERE group_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, TalentGroupMember>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_escort_ids(pool: &PgPool, group_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT escort_id FROM talent_group_escorts
             WHERE group_id = $1
             ORDER BY created_at, escort_id",
        )
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    async fn detail_for(pool: &PgPool, group: TalentGroup) -> Result<TalentGroupDetail, sqlx::Error> {
        let members = Self::list_members(pool, group.id).await?;
        let escort_ids = Self::list_escort_ids(pool, group.id).await?;
        Ok(TalentGroupDetail {
            group,
            members,
            escort_ids,
        })
    }

    async fn set_members_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        group_id: DbId,
        members: &[GroupMember],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM talent_group_members WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut **tx)
            .await?;

        for (i, m) in members.iter().enumerate() {
            sqlx::query(
                "INSERT INTO talent_group_members
                    (group_id, first_name, last_name, role, sort_order)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(group_id)
            .bind(m.first_name.trim())
            .bind(m.last_name.trim())
            .bind(&m.role)
            .bind(i as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    async fn set_escorts_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        group_id: DbId,
        escort_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM talent_group_escorts WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut **tx)
            .await?;

        for &escort_id in escort_ids {
            sqlx::query(
                "INSERT INTO talent_group_escorts (group_id, escort_id)
                 VALUES ($1, $2)
                 ON CONFLICT (group_id, escort_id) DO NOTHING",
            )
            .bind(group_id)
            .bind(escort_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
