//! Timecard status machine, hour/pay arithmetic, and edit auditing.
//!
//! Hours and break durations are expressed in hours, rounded to two decimal
//! places. Pay is rounded to cents. All values are clamped at zero so a
//! malformed entry never produces negative pay.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_SUBMITTED: &str = "submitted";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_EDIT_DRAFT: &str = "edit_draft";

/// All valid timecard status strings.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_DRAFT,
    STATUS_SUBMITTED,
    STATUS_APPROVED,
    STATUS_REJECTED,
    STATUS_EDIT_DRAFT,
];

// ---------------------------------------------------------------------------
// Audit action constants
// ---------------------------------------------------------------------------

pub const ACTION_USER_EDIT: &str = "user_edit";
pub const ACTION_ADMIN_EDIT: &str = "admin_edit";
pub const ACTION_REJECTION_EDIT: &str = "rejection_edit";

/// All valid audit action types.
pub const VALID_ACTIONS: &[&str] = &[ACTION_USER_EDIT, ACTION_ADMIN_EDIT, ACTION_REJECTION_EDIT];

/// Upper bound on a plausible hourly pay rate.
pub const MAX_PAY_RATE: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// Status machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimecardStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    /// Owner is correcting a rejected timecard before resubmitting.
    EditDraft,
}

impl TimecardStatus {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_SUBMITTED => Ok(Self::Submitted),
            STATUS_APPROVED => Ok(Self::Approved),
            STATUS_REJECTED => Ok(Self::Rejected),
            STATUS_EDIT_DRAFT => Ok(Self::EditDraft),
            _ => Err(format!(
                "Invalid timecard status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Submitted => STATUS_SUBMITTED,
            Self::Approved => STATUS_APPROVED,
            Self::Rejected => STATUS_REJECTED,
            Self::EditDraft => STATUS_EDIT_DRAFT,
        }
    }

    /// Statuses reachable from `self`. `Approved` is terminal.
    pub fn valid_transitions(&self) -> &'static [TimecardStatus] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::EditDraft => &[Self::Submitted],
            Self::Submitted => &[Self::Approved, Self::Rejected, Self::Draft],
            Self::Rejected => &[Self::Draft, Self::EditDraft],
            Self::Approved => &[],
        }
    }

    pub fn can_transition_to(&self, to: TimecardStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Whether daily entries may be written through the plain entry endpoints.
    pub fn accepts_entry_writes(&self) -> bool {
        matches!(self, Self::Draft | Self::EditDraft)
    }
}

/// Validate a status transition, returning a conflict for invalid ones.
pub fn validate_transition(from: TimecardStatus, to: TimecardStatus) -> Result<(), CoreError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Invalid timecard transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

// ---------------------------------------------------------------------------
// Edit actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    UserEdit,
    AdminEdit,
    RejectionEdit,
}

impl EditAction {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            ACTION_USER_EDIT => Ok(Self::UserEdit),
            ACTION_ADMIN_EDIT => Ok(Self::AdminEdit),
            ACTION_REJECTION_EDIT => Ok(Self::RejectionEdit),
            _ => Err(format!(
                "Invalid edit action '{s}'. Must be one of: {}",
                VALID_ACTIONS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserEdit => ACTION_USER_EDIT,
            Self::AdminEdit => ACTION_ADMIN_EDIT,
            Self::RejectionEdit => ACTION_REJECTION_EDIT,
        }
    }

    pub fn requires_admin(&self) -> bool {
        !matches!(self, Self::UserEdit)
    }
}

/// What an edit does to the timecard beyond changing its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Whether field changes are written to the audit log.
    pub audited: bool,
    pub next_status: TimecardStatus,
}

/// Decide whether `action` may edit a timecard in `status`.
///
/// Owners edit drafts freely; once a timecard has been through review every
/// change is audited. Approved timecards are closed.
pub fn plan_edit(action: EditAction, status: TimecardStatus) -> Result<EditOutcome, CoreError> {
    use TimecardStatus::*;

    let outcome = match (action, status) {
        (EditAction::UserEdit, Draft) => Some((false, Draft)),
        (EditAction::UserEdit, EditDraft) => Some((true, EditDraft)),
        (EditAction::UserEdit, Rejected) => Some((true, EditDraft)),
        (EditAction::AdminEdit, Submitted) => Some((true, Submitted)),
        (EditAction::RejectionEdit, Submitted) => Some((true, Rejected)),
        _ => None,
    };

    outcome
        .map(|(audited, next_status)| EditOutcome {
            audited,
            next_status,
        })
        .ok_or_else(|| {
            CoreError::Conflict(format!(
                "A {} is not allowed on a {} timecard",
                action.as_str(),
                status.as_str()
            ))
        })
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Raw timestamps of one work day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTimes {
    pub check_in_time: Option<Timestamp>,
    pub check_out_time: Option<Timestamp>,
    pub break_start_time: Option<Timestamp>,
    pub break_end_time: Option<Timestamp>,
}

/// Derived values of one work day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyFigures {
    pub hours_worked: f64,
    pub break_duration: f64,
    pub daily_pay: f64,
}

/// Period totals of a timecard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimecardTotals {
    pub total_hours: f64,
    pub total_break_duration: f64,
    pub total_pay: f64,
}

/// Round half away from zero to two decimal places.
///
/// The value is first snapped to nine decimals so that binary noise such as
/// `2.675 * 100.0 == 267.49999999999997` still rounds as the decimal reads.
pub fn round_to_cents(value: f64) -> f64 {
    let cents = (value * 1e9).round() / 1e7;
    cents.round() / 100.0
}

/// Hours between two instants, clamped at zero.
fn span_hours(start: Timestamp, end: Timestamp) -> f64 {
    let secs = (end - start).num_seconds();
    (secs.max(0) as f64) / 3600.0
}

/// Break length in hours. Zero unless both break fields are present.
pub fn compute_break_hours(times: &DailyTimes) -> f64 {
    match (times.break_start_time, times.break_end_time) {
        (Some(start), Some(end)) => span_hours(start, end),
        _ => 0.0,
    }
}

/// Compute the derived values of one day at `pay_rate` per hour.
pub fn compute_daily(times: &DailyTimes, pay_rate: f64) -> DailyFigures {
    let break_hours = compute_break_hours(times);

    let shift_hours = match (times.check_in_time, times.check_out_time) {
        (Some(check_in), Some(check_out)) => span_hours(check_in, check_out),
        _ => 0.0,
    };

    let hours_worked = round_to_cents((shift_hours - break_hours).max(0.0));
    let daily_pay = round_to_cents((hours_worked * pay_rate.max(0.0)).max(0.0));

    DailyFigures {
        hours_worked,
        break_duration: round_to_cents(break_hours),
        daily_pay,
    }
}

/// Sum daily figures into header totals.
pub fn sum_totals<'a, I>(figures: I) -> TimecardTotals
where
    I: IntoIterator<Item = &'a DailyFigures>,
{
    let mut totals = figures
        .into_iter()
        .fold(TimecardTotals::default(), |mut acc, f| {
            acc.total_hours += f.hours_worked;
            acc.total_break_duration += f.break_duration;
            acc.total_pay += f.daily_pay;
            acc
        });

    totals.total_hours = round_to_cents(totals.total_hours);
    totals.total_break_duration = round_to_cents(totals.total_break_duration);
    totals.total_pay = round_to_cents(totals.total_pay);
    totals
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an hourly pay rate.
pub fn validate_pay_rate(rate: f64) -> Result<(), String> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(format!("Pay rate must be a non-negative number, got {rate}"));
    }
    if rate > MAX_PAY_RATE {
        return Err(format!("Pay rate {rate} exceeds maximum of {MAX_PAY_RATE}"));
    }
    Ok(())
}

/// Validate a pay period's bounds.
pub fn validate_period(start: Date, end: Date) -> Result<(), String> {
    if end < start {
        return Err(format!(
            "Period end date {end} is before start date {start}"
        ));
    }
    Ok(())
}

/// Validate that a work date falls within its timecard's period.
pub fn validate_work_date(period_start: Date, period_end: Date, date: Date) -> Result<(), String> {
    if date < period_start || date > period_end {
        return Err(format!(
            "Work date {date} is outside the timecard period {period_start} to {period_end}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Edit diffing + audit
// ---------------------------------------------------------------------------

/// Editable time fields of a daily entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimecardField {
    CheckInTime,
    CheckOutTime,
    BreakStartTime,
    BreakEndTime,
}

impl TimecardField {
    /// Column name, also stored as `timecard_audit_log.field_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckInTime => "check_in_time",
            Self::CheckOutTime => "check_out_time",
            Self::BreakStartTime => "break_start_time",
            Self::BreakEndTime => "break_end_time",
        }
    }
}

/// Requested new values for one day. `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DailyTimesPatch {
    pub check_in_time: Option<Timestamp>,
    pub check_out_time: Option<Timestamp>,
    pub break_start_time: Option<Timestamp>,
    pub break_end_time: Option<Timestamp>,
}

impl DailyTimesPatch {
    pub fn apply(&self, current: &DailyTimes) -> DailyTimes {
        DailyTimes {
            check_in_time: self.check_in_time.or(current.check_in_time),
            check_out_time: self.check_out_time.or(current.check_out_time),
            break_start_time: self.break_start_time.or(current.break_start_time),
            break_end_time: self.break_end_time.or(current.break_end_time),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.check_in_time.is_none()
            && self.check_out_time.is_none()
            && self.break_start_time.is_none()
            && self.break_end_time.is_none()
    }
}

/// One field whose value differs between two versions of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    pub field: TimecardField,
    pub old_value: Option<Timestamp>,
    pub new_value: Option<Timestamp>,
}

/// List the fields that changed between `old` and `new`.
pub fn diff_times(old: &DailyTimes, new: &DailyTimes) -> Vec<FieldChange> {
    [
        (TimecardField::CheckInTime, old.check_in_time, new.check_in_time),
        (TimecardField::CheckOutTime, old.check_out_time, new.check_out_time),
        (TimecardField::BreakStartTime, old.break_start_time, new.break_start_time),
        (TimecardField::BreakEndTime, old.break_end_time, new.break_end_time),
    ]
    .into_iter()
    .filter(|(_, before, after)| before != after)
    .map(|(field, old_value, new_value)| FieldChange {
        field,
        old_value,
        new_value,
    })
    .collect()
}

/// Text form stored in `old_value`/`new_value`.
pub fn format_audit_value(value: Option<Timestamp>) -> Option<String> {
    value.map(|ts| ts.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// A fully-formed audit row, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
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

/// Who made an edit and when; shared by every row of one edit action.
#[derive(Debug, Clone, Copy)]
pub struct AuditContext {
    pub timecard_id: DbId,
    pub change_id: DbId,
    pub changed_by: DbId,
    pub changed_at: Timestamp,
    pub action: EditAction,
}

/// Build one audit row per changed field of a day.
pub fn build_audit_entries(
    ctx: &AuditContext,
    work_date: Date,
    changes: &[FieldChange],
) -> Vec<AuditEntry> {
    changes
        .iter()
        .map(|c| AuditEntry {
            timecard_id: ctx.timecard_id,
            change_id: ctx.change_id,
            field_name: c.field.as_str().to_string(),
            old_value: format_audit_value(c.old_value),
            new_value: format_audit_value(c.new_value),
            changed_by: ctx.changed_by,
            changed_at: ctx.changed_at,
            action_type: ctx.action.as_str().to_string(),
            work_date,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
