//! Project readiness evaluation.
//!
//! Summarizes how far a project's configuration and staffing have come into
//! per-area statuses and one overall tier. The `core` crate contains no
//! database dependencies; evaluation is done against counts loaded by the
//! caller, and the result is always recomputed from scratch.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Areas that can be finalized independently.
pub const AREA_LOCATIONS: &str = "locations";
pub const AREA_ROLES: &str = "roles";
pub const AREA_TEAM: &str = "team";
pub const AREA_TALENT: &str = "talent";

/// All valid readiness areas.
pub const VALID_AREAS: &[&str] = &[AREA_LOCATIONS, AREA_ROLES, AREA_TEAM, AREA_TALENT];

/// Configuration status values (locations and roles).
pub const CONFIG_DEFAULT_ONLY: &str = "default-only";
pub const CONFIG_CONFIGURED: &str = "configured";
pub const CONFIG_FINALIZED: &str = "finalized";

/// Staffing status values (team and talent).
pub const STAFFING_NONE: &str = "none";
pub const STAFFING_PARTIAL: &str = "partial";
pub const STAFFING_FINALIZED: &str = "finalized";

/// Overall tier values.
pub const OVERALL_GETTING_STARTED: &str = "getting-started";
pub const OVERALL_OPERATIONAL: &str = "operational";
pub const OVERALL_PRODUCTION_READY: &str = "production-ready";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A finalizable readiness area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessArea {
    Locations,
    Roles,
    Team,
    Talent,
}

impl ReadinessArea {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            AREA_LOCATIONS => Ok(Self::Locations),
            AREA_ROLES => Ok(Self::Roles),
            AREA_TEAM => Ok(Self::Team),
            AREA_TALENT => Ok(Self::Talent),
            _ => Err(format!(
                "Invalid readiness area '{s}'. Must be one of: {}",
                VALID_AREAS.join(", ")
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locations => AREA_LOCATIONS,
            Self::Roles => AREA_ROLES,
            Self::Team => AREA_TEAM,
            Self::Talent => AREA_TALENT,
        }
    }
}

/// Status of a configuration area (locations, roles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigStatus {
    #[serde(rename = "default-only")]
    DefaultOnly,
    #[serde(rename = "configured")]
    Configured,
    #[serde(rename = "finalized")]
    Finalized,
}

impl ConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultOnly => CONFIG_DEFAULT_ONLY,
            Self::Configured => CONFIG_CONFIGURED,
            Self::Finalized => CONFIG_FINALIZED,
        }
    }
}

/// Status of a staffing area (team, talent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    None,
    Partial,
    Finalized,
}

impl StaffingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => STAFFING_NONE,
            Self::Partial => STAFFING_PARTIAL,
            Self::Finalized => STAFFING_FINALIZED,
        }
    }
}

/// Overall project readiness tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallStatus {
    GettingStarted,
    Operational,
    ProductionReady,
}

impl OverallStatus {
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            OVERALL_GETTING_STARTED => Ok(Self::GettingStarted),
            OVERALL_OPERATIONAL => Ok(Self::Operational),
            OVERALL_PRODUCTION_READY => Ok(Self::ProductionReady),
            _ => Err(format!("Invalid overall readiness status '{s}'")),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GettingStarted => OVERALL_GETTING_STARTED,
            Self::Operational => OVERALL_OPERATIONAL,
            Self::ProductionReady => OVERALL_PRODUCTION_READY,
        }
    }
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

/// Fresh counts loaded for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessCounts {
    /// Non-default locations.
    pub custom_location_count: i64,
    /// Non-default role templates.
    pub custom_role_count: i64,
    pub total_staff_count: i64,
    /// Staff holding the escort role.
    pub escort_count: i64,
    /// Assigned individual talent plus talent groups.
    pub total_talent_count: i64,
}

/// Per-area finalize flags as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessFlags {
    pub locations_finalized: bool,
    pub roles_finalized: bool,
    pub team_finalized: bool,
    pub talent_finalized: bool,
}

impl ReadinessFlags {
    pub fn set(&mut self, area: ReadinessArea, value: bool) {
        match area {
            ReadinessArea::Locations => self.locations_finalized = value,
            ReadinessArea::Roles => self.roles_finalized = value,
            ReadinessArea::Team => self.team_finalized = value,
            ReadinessArea::Talent => self.talent_finalized = value,
        }
    }

    pub fn all_finalized(&self) -> bool {
        self.locations_finalized && self.roles_finalized && self.team_finalized && self.talent_finalized
    }
}

/// Derived statuses for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadinessEvaluation {
    pub locations_status: ConfigStatus,
    pub roles_status: ConfigStatus,
    pub team_status: StaffingStatus,
    pub talent_status: StaffingStatus,
    pub overall_status: OverallStatus,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

fn config_status(custom_count: i64, finalized: bool) -> ConfigStatus {
    if finalized {
        ConfigStatus::Finalized
    } else if custom_count > 0 {
        ConfigStatus::Configured
    } else {
        ConfigStatus::DefaultOnly
    }
}

fn staffing_status(count: i64, finalized: bool) -> StaffingStatus {
    if finalized {
        StaffingStatus::Finalized
    } else if count > 0 {
        StaffingStatus::Partial
    } else {
        StaffingStatus::None
    }
}

/// Derive every status from counts and flags.
pub fn evaluate_readiness(counts: &ReadinessCounts, flags: &ReadinessFlags) -> ReadinessEvaluation {
    let overall_status = if flags.all_finalized() {
        OverallStatus::ProductionReady
    } else if counts.total_staff_count > 0
        && counts.total_talent_count > 0
        && counts.escort_count > 0
    {
        OverallStatus::Operational
    } else {
        OverallStatus::GettingStarted
    };

    ReadinessEvaluation {
        locations_status: config_status(counts.custom_location_count, flags.locations_finalized),
        roles_status: config_status(counts.custom_role_count, flags.roles_finalized),
        team_status: staffing_status(counts.total_staff_count, flags.team_finalized),
        talent_status: staffing_status(counts.total_talent_count, flags.talent_finalized),
        overall_status,
    }
}

/// Validate a readiness area string.
pub fn validate_area(area: &str) -> Result<ReadinessArea, String> {
    ReadinessArea::from_str_value(area)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
