//! Project readiness record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::readiness::ReadinessFlags;
use talentops_core::types::{DbId, Timestamp};

/// A row from the `project_readiness` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectReadiness {
    pub project_id: DbId,
    pub custom_location_count: i64,
    pub custom_role_count: i64,
    pub total_staff_count: i64,
    pub escort_count: i64,
    pub total_talent_count: i64,
    pub locations_status: String,
    pub roles_status: String,
    pub team_status: String,
    pub talent_status: String,
    pub locations_finalized: bool,
    pub roles_finalized: bool,
    pub team_finalized: bool,
    pub talent_finalized: bool,
    pub overall_status: String,
    pub last_updated: Timestamp,
}

impl ProjectReadiness {
    pub fn flags(&self) -> ReadinessFlags {
        ReadinessFlags {
            locations_finalized: self.locations_finalized,
            roles_finalized: self.roles_finalized,
            team_finalized: self.team_finalized,
            talent_finalized: self.talent_finalized,
        }
    }
}

/// DTO for `POST /projects/{id}/readiness/finalize`.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeArea {
    pub area: String,
    /// `false` re-opens a finalized area. Defaults to `true`.
    pub finalized: Option<bool>,
}
