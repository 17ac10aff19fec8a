//! Project role template model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::types::{DbId, Timestamp};

/// A row from the `project_role_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRoleTemplate {
    pub id: DbId,
    pub project_id: DbId,
    pub role: String,
    pub display_name: String,
    pub base_pay_rate: f64,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a role template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleTemplate {
    pub role: String,
    pub display_name: String,
    pub base_pay_rate: Option<f64>,
    pub is_default: Option<bool>,
}
