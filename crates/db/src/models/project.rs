//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::daily_assignment::ProjectWindow;
use talentops_core::error::CoreError;
use talentops_core::types::{Date, DbId, Timestamp};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The inclusive date range daily assignments must fall into.
    pub fn window(&self) -> Result<ProjectWindow, CoreError> {
        ProjectWindow::new(self.start_date, self.end_date)
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
}
