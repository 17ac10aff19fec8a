//! Daily assignment types and pure planning functions.
//!
//! A period-level assignment (one escort for a talent across a project, or a
//! set of escorts for a talent group) expands into one row per
//! (entity, date, escort). The parent's `scheduled_dates` array is always
//! derived from those rows, never edited on its own.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entity type stored alongside snapshots and reported in summaries.
pub const ENTITY_TALENT: &str = "talent";
pub const ENTITY_GROUP: &str = "group";

/// All valid entity type strings.
pub const VALID_ENTITY_TYPES: &[&str] = &[ENTITY_TALENT, ENTITY_GROUP];

// ---------------------------------------------------------------------------
// Entity + window
// ---------------------------------------------------------------------------

/// The owner of a set of daily assignment rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum AssignmentEntity {
    /// An individual talent, keyed by `talent.id`.
    Talent(DbId),
    /// A talent group, keyed by `talent_groups.id`.
    Group(DbId),
}

impl AssignmentEntity {
    /// Rebuild an entity from its stored `(entity_type, entity_id)` pair.
    pub fn from_parts(entity_type: &str, id: DbId) -> Result<Self, String> {
        match entity_type {
            ENTITY_TALENT => Ok(Self::Talent(id)),
            ENTITY_GROUP => Ok(Self::Group(id)),
            _ => Err(format!(
                "Invalid entity type '{entity_type}'. Must be one of: {}",
                VALID_ENTITY_TYPES.join(", ")
            )),
        }
    }

    pub fn entity_type(&self) -> &'static str {
        match self {
            Self::Talent(_) => ENTITY_TALENT,
            Self::Group(_) => ENTITY_GROUP,
        }
    }

    pub fn id(&self) -> DbId {
        match self {
            Self::Talent(id) | Self::Group(id) => *id,
        }
    }

    /// Groups may hold several escorts on the same date; talent may not.
    pub fn allows_multiple_escorts(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

/// Inclusive date range of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWindow {
    pub start_date: Date,
    pub end_date: Date,
}

impl ProjectWindow {
    pub fn new(start_date: Date, end_date: Date) -> Result<Self, CoreError> {
        if end_date < start_date {
            return Err(CoreError::Validation(format!(
                "Project end date {end_date} is before start date {start_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn contains(&self, date: Date) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Reject a date that falls outside the window.
    pub fn check(&self, date: Date) -> Result<(), CoreError> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(CoreError::DateOutOfRange {
                date,
                start: self.start_date,
                end: self.end_date,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Rows and plans
// ---------------------------------------------------------------------------

/// A period-level assignment as loaded before reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAssignment {
    pub entity: AssignmentEntity,
    pub project_id: DbId,
    /// Escorts for the whole period. Talent carry at most one.
    pub escort_ids: Vec<DbId>,
    /// Current `scheduled_dates`. Order and duplicates are irrelevant.
    pub scheduled_dates: Vec<Date>,
}

/// One daily assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyRow {
    pub entity: AssignmentEntity,
    pub project_id: DbId,
    pub assignment_date: Date,
    pub escort_id: DbId,
}

/// A scheduled date that could not be expanded into rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedDate {
    pub entity: AssignmentEntity,
    pub date: Date,
    pub reason: String,
}

/// Rows to write for one period-level assignment, plus the dates refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyPlan {
    pub rows: Vec<DailyRow>,
    pub rejected: Vec<RejectedDate>,
}

/// Changes needed to move a group from its current rows to a new schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupSchedulePlan {
    pub to_upsert: Vec<DailyRow>,
    pub to_delete: Vec<DailyRow>,
    /// The resulting distinct sorted schedule.
    pub scheduled_dates: Vec<Date>,
}

/// Difference between a stored schedule and the one derived from rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleMismatch {
    pub entity: AssignmentEntity,
    /// Dates that have rows but are absent from the stored array.
    pub missing: Vec<Date>,
    /// Dates in the stored array with no backing row.
    pub extra: Vec<Date>,
}

// ---------------------------------------------------------------------------
// Planning functions
// ---------------------------------------------------------------------------

/// Sort and de-duplicate a list of dates.
pub fn normalize_dates(dates: &[Date]) -> Vec<Date> {
    dates.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Derive `scheduled_dates` from a set of daily rows.
pub fn derive_scheduled_dates(rows: &[DailyRow]) -> Vec<Date> {
    rows.iter()
        .map(|r| r.assignment_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Expand a period-level assignment into daily rows.
///
/// Talent produce one row per date using their first escort; groups produce
/// one row per (date, escort). Out-of-range dates go to `rejected`. An
/// assignment without escorts yields an empty plan.
pub fn plan_daily_rows(assignment: &PeriodAssignment, window: &ProjectWindow) -> DailyPlan {
    let escorts: Vec<DbId> = if assignment.entity.allows_multiple_escorts() {
        assignment
            .escort_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        assignment.escort_ids.first().copied().into_iter().collect()
    };

    let mut plan = DailyPlan::default();
    if escorts.is_empty() {
        return plan;
    }

    for date in normalize_dates(&assignment.scheduled_dates) {
        if let Err(e) = window.check(date) {
            plan.rejected.push(RejectedDate {
                entity: assignment.entity,
                date,
                reason: e.to_string(),
            });
            continue;
        }
        for escort_id in &escorts {
            plan.rows.push(DailyRow {
                entity: assignment.entity,
                project_id: assignment.project_id,
                assignment_date: date,
                escort_id: *escort_id,
            });
        }
    }

    plan
}

/// Compute the row changes that replace a group's schedule.
///
/// Every date is validated before anything is planned, so a single bad date
/// fails the whole request. A non-empty schedule requires at least one escort.
pub fn plan_group_schedule(
    group_id: DbId,
    project_id: DbId,
    window: &ProjectWindow,
    dates: &[Date],
    escort_ids: &[DbId],
    existing: &[DailyRow],
) -> Result<GroupSchedulePlan, CoreError> {
    let dates = normalize_dates(dates);
    for date in &dates {
        window.check(*date)?;
    }

    let escorts: BTreeSet<DbId> = escort_ids.iter().copied().collect();
    if !dates.is_empty() && escorts.is_empty() {
        return Err(CoreError::Validation(
            "A group needs at least one escort before it can be scheduled".to_string(),
        ));
    }

    let entity = AssignmentEntity::Group(group_id);
    let desired: BTreeSet<DailyRow> = dates
        .iter()
        .flat_map(|date| {
            escorts.iter().map(move |escort_id| DailyRow {
                entity,
                project_id,
                assignment_date: *date,
                escort_id: *escort_id,
            })
        })
        .collect();
    let current: BTreeSet<DailyRow> = existing.iter().copied().collect();

    Ok(GroupSchedulePlan {
        to_upsert: desired.difference(&current).copied().collect(),
        to_delete: current.difference(&desired).copied().collect(),
        scheduled_dates: dates,
    })
}

/// Compare a stored schedule against its rows. Returns `None` when in sync.
pub fn find_schedule_mismatch(
    entity: AssignmentEntity,
    stored: &[Date],
    rows: &[DailyRow],
) -> Option<ScheduleMismatch> {
    let stored: BTreeSet<Date> = stored.iter().copied().collect();
    let derived: BTreeSet<Date> = rows.iter().map(|r| r.assignment_date).collect();

    if stored == derived {
        return None;
    }

    Some(ScheduleMismatch {
        entity,
        missing: derived.difference(&stored).copied().collect(),
        extra: stored.difference(&derived).copied().collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
