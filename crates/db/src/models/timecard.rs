//! Timecard header, daily entry, and audit log models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentops_core::timecard::{DailyTimes, DailyTimesPatch};
use talentops_core::types::{Date, DbId, Timestamp};

/// A row from the `timecard_headers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimecardHeader {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub status: String,
    pub period_start_date: Date,
    pub period_end_date: Date,
    pub pay_rate: f64,
    pub total_hours: f64,
    pub total_break_duration: f64,
    pub total_pay: f64,
    pub submitted_at: Option<Timestamp>,
    pub approved_at: Option<Timestamp>,
    pub approved_by: Option<DbId>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `timecard_daily_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimecardDailyEntry {
    pub id: DbId,
    pub timecard_header_id: DbId,
    pub work_date: Date,
    pub check_in_time: Option<Timestamp>,
    pub check_out_time: Option<Timestamp>,
    pub break_start_time: Option<Timestamp>,
    pub break_end_time: Option<Timestamp>,
    pub hours_worked: f64,
    pub break_duration: f64,
    pub daily_pay: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TimecardDailyEntry {
    pub fn times(&self) -> DailyTimes {
        DailyTimes {
            check_in_time: self.check_in_time,
            check_out_time: self.check_out_time,
            break_start_time: self.break_start_time,
            break_end_time: self.break_end_time,
        }
    }
}

/// A header with its daily entries in date order.
#[derive(Debug, Clone, Serialize)]
pub struct TimecardWithEntries {
    #[serde(flatten)]
    pub header: TimecardHeader,
    pub entries: Vec<TimecardDailyEntry>,
}

/// A row from the `timecard_audit_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimecardAuditRow {
    pub id: DbId,
    pub timecard_id: DbId,
    pub change_id: DbId,
    pub field_name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: DbId,
    pub changed_at: Timestamp,
    pub action_type: String,
    pub work_date: Date,
}

/// DTO for creating a timecard header.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimecard {
    pub project_id: DbId,
    pub period_start_date: Date,
    pub period_end_date: Date,
    /// Falls back to the owner's team pay rate, then zero.
    pub pay_rate: Option<f64>,
}

/// One day's changes within an audited edit.
#[derive(Debug, Clone, Deserialize)]
pub struct DayEdit {
    pub work_date: Date,
    #[serde(flatten)]
    pub times: DailyTimesPatch,
}

/// DTO for `POST /timecards/edit`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditTimecard {
    pub timecard_id: DbId,
    pub action_type: String,
    pub days: Vec<DayEdit>,
    /// Required for `rejection_edit`.
    pub reason: Option<String>,
}

/// Result of an audited edit.
#[derive(Debug, Clone, Serialize)]
pub struct EditResult {
    pub timecard: TimecardWithEntries,
    /// `None` when nothing changed or the edit was not audited.
    pub change_id: Option<DbId>,
    pub audit_rows: usize,
}
