//! Rollback snapshot rows.

use serde::Serialize;
use sqlx::FromRow;
use talentops_core::types::{Date, DbId, Timestamp};

/// A row from the `schedule_snapshots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleSnapshotRow {
    pub id: DbId,
    pub run_id: DbId,
    pub project_id: DbId,
    pub entity_type: String,
    pub entity_id: DbId,
    pub scheduled_dates: Vec<Date>,
    pub restored_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
