//! Project location model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::types::{DbId, Timestamp};

/// A row from the `project_locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectLocation {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// Seeded locations do not count towards readiness.
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a location.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectLocation {
    pub name: String,
    pub is_default: Option<bool>,
}
