//! Project team (staff) assignments.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::types::{DbId, Timestamp};

/// A row from the `team_assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamAssignment {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub pay_rate: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Team assignment joined with the staff member's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TeamMember {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub pay_rate: Option<f64>,
}

/// DTO for adding a staff member to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamAssignment {
    pub user_id: DbId,
    pub role: String,
    pub pay_rate: Option<f64>,
}
