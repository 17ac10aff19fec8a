//! Per-date escort assignment rows.

use serde::Serialize;
use sqlx::FromRow;
use talentops_core::types::{Date, DbId, Timestamp};

/// A row from the `talent_daily_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentDailyAssignment {
    pub id: DbId,
    pub talent_id: DbId,
    pub project_id: DbId,
    pub assignment_date: Date,
    pub escort_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `group_daily_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupDailyAssignment {
    pub id: DbId,
    pub group_id: DbId,
    pub project_id: DbId,
    pub assignment_date: Date,
    pub escort_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
