//! Talent and their project assignments.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::types::{Date, DbId, Timestamp};

/// A row from the `talent` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Talent {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a talent record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTalent {
    pub first_name: String,
    pub last_name: String,
}

/// A row from the `talent_project_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentAssignment {
    pub id: DbId,
    pub talent_id: DbId,
    pub project_id: DbId,
    pub escort_id: Option<DbId>,
    pub scheduled_dates: Vec<Date>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for assigning talent to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTalentAssignment {
    pub talent_id: DbId,
    pub escort_id: Option<DbId>,
    #[serde(default)]
    pub scheduled_dates: Vec<Date>,
}
