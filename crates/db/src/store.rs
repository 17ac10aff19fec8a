//! Postgres implementation of the reconciler's [`AssignmentStore`].

use async_trait::async_trait;
use sqlx::PgPool;
use talentops_core::daily_assignment::{AssignmentEntity, DailyRow, PeriodAssignment};
use talentops_core::error::{CoreError, CoreResult};
use talentops_core::reconciler::{AssignmentStore, ScheduleSnapshot};
use talentops_core::types::{Date, DbId};

use crate::map_db_error;
use crate::repositories::{
    DailyAssignmentRepo, SnapshotRepo, TalentAssignmentRepo, TalentGroupRepo,
};

/// Assignment store backed by the connection pool.
#[derive(Clone)]
pub struct PgAssignmentStore {
    pool: PgPool,
}

impl PgAssignmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn period_assignments(&self, project_id: DbId) -> CoreResult<Vec<PeriodAssignment>> {
        let talent = TalentAssignmentRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(map_db_error)?;
        let groups = TalentGroupRepo::list_groups(&self.pool, project_id)
            .await
            .map_err(map_db_error)?;

        let mut result = Vec::with_capacity(talent.len() + groups.len());

        result.extend(talent.into_iter().map(|a| PeriodAssignment {
            entity: AssignmentEntity::Talent(a.talent_id),
            project_id,
            escort_ids: a.escort_id.into_iter().collect(),
            scheduled_dates: a.scheduled_dates,
        }));

        for g in groups {
            let escort_ids = TalentGroupRepo::list_escort_ids(&self.pool, g.id)
                .await
                .map_err(map_db_error)?;
            result.push(PeriodAssignment {
                entity: AssignmentEntity::Group(g.id),
                project_id,
                escort_ids,
                scheduled_dates: g.scheduled_dates,
            });
        }

        Ok(result)
    }

    async fn list_days(
        &self,
        entity: AssignmentEntity,
        project_id: DbId,
    ) -> CoreResult<Vec<DailyRow>> {
        let rows = match entity {
            AssignmentEntity::Talent(talent_id) => {
                DailyAssignmentRepo::list_talent_days(&self.pool, talent_id, project_id)
                    .await
                    .map_err(map_db_error)?
                    .into_iter()
                    .map(|r| (r.assignment_date, r.escort_id))
                    .collect::<Vec<_>>()
            }
            AssignmentEntity::Group(group_id) => {
                DailyAssignmentRepo::list_group_days(&self.pool, group_id, project_id)
                    .await
                    .map_err(map_db_error)?
                    .into_iter()
                    .map(|r| (r.assignment_date, r.escort_id))
                    .collect::<Vec<_>>()
            }
        };

        Ok(rows
            .into_iter()
            .map(|(assignment_date, escort_id)| DailyRow {
                entity,
                project_id,
                assignment_date,
                escort_id,
            })
            .collect())
    }

    async fn upsert_day(&self, row: &DailyRow) -> CoreResult<()> {
        let result = match row.entity {
            AssignmentEntity::Talent(talent_id) => {
                let written = DailyAssignmentRepo::upsert_talent_day(
                    &self.pool,
                    talent_id,
                    row.project_id,
                    row.assignment_date,
                    row.escort_id,
                )
                .await
                .map_err(map_db_error)?;
                if written.is_none() {
                    return Err(CoreError::Conflict(format!(
                        "Talent {talent_id} already has a daily assignment on {} in another project",
                        row.assignment_date
                    )));
                }
                Ok(())
            }
            AssignmentEntity::Group(group_id) => DailyAssignmentRepo::upsert_group_day(
                &self.pool,
                group_id,
                row.project_id,
                row.assignment_date,
                row.escort_id,
            )
            .await
            .map(|_| ()),
        };
        result.map_err(map_db_error)
    }

    async fn delete_day(&self, row: &DailyRow) -> CoreResult<bool> {
        let result = match row.entity {
            AssignmentEntity::Talent(talent_id) => DailyAssignmentRepo::delete_talent_day(
                &self.pool,
                talent_id,
                row.project_id,
                row.assignment_date,
            )
            .await,
            AssignmentEntity::Group(group_id) => DailyAssignmentRepo::delete_group_day(
                &self.pool,
                group_id,
                row.project_id,
                row.assignment_date,
                row.escort_id,
            )
            .await,
        };
        result.map_err(map_db_error)
    }

    async fn write_scheduled_dates(
        &self,
        entity: AssignmentEntity,
        project_id: DbId,
        dates: &[Date],
    ) -> CoreResult<()> {
        let updated = match entity {
            AssignmentEntity::Talent(talent_id) => {
                TalentAssignmentRepo::set_scheduled_dates(&self.pool, project_id, talent_id, dates)
                    .await
            }
            AssignmentEntity::Group(group_id) => {
                TalentGroupRepo::set_scheduled_dates(&self.pool, project_id, group_id, dates).await
            }
        }
        .map_err(map_db_error)?;

        tracing::debug!(
            entity = entity.entity_type(),
            entity_id = %entity.id(),
            %project_id,
            dates = dates.len(),
            updated,
            "Scheduled dates written"
        );

        if updated {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: match entity {
                    AssignmentEntity::Talent(_) => "TalentAssignment",
                    AssignmentEntity::Group(_) => "TalentGroup",
                },
                id: entity.id(),
            })
        }
    }

    async fn delete_project_days(&self, project_id: DbId) -> CoreResult<u64> {
        let deleted = DailyAssignmentRepo::delete_by_project(&self.pool, project_id)
            .await
            .map_err(map_db_error)?;
        tracing::debug!(%project_id, deleted, "Daily rows deleted for project");
        Ok(deleted)
    }

    async fn pending_snapshots(&self, project_id: DbId) -> CoreResult<Vec<ScheduleSnapshot>> {
        let rows = SnapshotRepo::list_pending(&self.pool, project_id)
            .await
            .map_err(map_db_error)?;

        rows.into_iter()
            .map(|r| {
                let entity = AssignmentEntity::from_parts(&r.entity_type, r.entity_id)
                    .map_err(CoreError::Internal)?;
                Ok(ScheduleSnapshot {
                    entity,
                    project_id: r.project_id,
                    scheduled_dates: r.scheduled_dates,
                })
            })
            .collect()
    }

    async fn save_snapshots(
        &self,
        run_id: DbId,
        project_id: DbId,
        snapshots: &[ScheduleSnapshot],
    ) -> CoreResult<()> {
        let entries: Vec<(&str, DbId, &[Date])> = snapshots
            .iter()
            .map(|s| {
                (
                    s.entity.entity_type(),
                    s.entity.id(),
                    s.scheduled_dates.as_slice(),
                )
            })
            .collect();

        SnapshotRepo::insert_many(&self.pool, run_id, project_id, &entries)
            .await
            .map(|_| ())
            .map_err(map_db_error)
    }

    async fn mark_snapshots_restored(&self, project_id: DbId) -> CoreResult<u64> {
        SnapshotRepo::mark_restored(&self.pool, project_id)
            .await
            .map_err(map_db_error)
    }
}
