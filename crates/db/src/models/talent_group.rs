//! Talent group model, its child collections, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::talent_group::GroupMember;
use talentops_core::types::{Date, DbId, Timestamp};

/// A row from the `talent_groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentGroup {
    pub id: DbId,
    pub project_id: DbId,
    pub group_name: String,
    pub scheduled_dates: Vec<Date>,
    pub point_of_contact_name: Option<String>,
    pub point_of_contact_phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `talent_group_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentGroupMember {
    pub id: DbId,
    pub group_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<String>,
    pub sort_order: i32,
}

/// A group with its members and escorts.
#[derive(Debug, Clone, Serialize)]
pub struct TalentGroupDetail {
    #[serde(flatten)]
    pub group: TalentGroup,
    pub members: Vec<TalentGroupMember>,
    pub escort_ids: Vec<DbId>,
}

/// DTO for creating a group.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTalentGroup {
    pub group_name: String,
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub escort_ids: Vec<DbId>,
    #[serde(default)]
    pub scheduled_dates: Vec<Date>,
    pub point_of_contact_name: Option<String>,
    pub point_of_contact_phone: Option<String>,
}

/// DTO for updating a group. `None` fields are left unchanged; a present
/// collection replaces the stored one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTalentGroup {
    pub group_name: Option<String>,
    pub members: Option<Vec<GroupMember>>,
    pub escort_ids: Option<Vec<DbId>>,
    pub scheduled_dates: Option<Vec<Date>>,
    pub point_of_contact_name: Option<String>,
    pub point_of_contact_phone: Option<String>,
}

/// DTO for replacing a group's schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceGroupSchedule {
    pub scheduled_dates: Vec<Date>,
    /// Replaces the group's escorts when present.
    pub escort_ids: Option<Vec<DbId>>,
}
