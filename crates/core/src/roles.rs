//! Well-known role name constants.
//!
//! Team roles must match the `team_assignments.role` check constraint in
//! `20260301000001_create_projects_and_people.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_IN_HOUSE: &str = "in_house";
pub const ROLE_SUPERVISOR: &str = "supervisor";
pub const ROLE_COORDINATOR: &str = "coordinator";
pub const ROLE_TALENT_ESCORT: &str = "talent_escort";

/// All valid project team roles.
pub const VALID_TEAM_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_IN_HOUSE,
    ROLE_SUPERVISOR,
    ROLE_COORDINATOR,
    ROLE_TALENT_ESCORT,
];

/// Validate that a team role is one of the known values.
pub fn validate_team_role(role: &str) -> Result<(), String> {
    if VALID_TEAM_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid team role '{role}'. Must be one of: {}",
            VALID_TEAM_ROLES.join(", ")
        ))
    }
}

/// Whether staff with this role count as escorts for readiness purposes.
pub fn is_escort_role(role: &str) -> bool {
    role == ROLE_TALENT_ESCORT
}

/// Map a legacy or display role name onto its canonical value.
///
/// Older rows used short codes and human-readable labels. Matching is
/// case-insensitive and ignores surrounding whitespace. Returns `None` for
/// names that have no canonical equivalent.
pub fn normalize_role_name(raw: &str) -> Option<&'static str> {
    let lower = raw.trim().to_lowercase();
    match lower.as_str() {
        "admin" | "administrator" => Some(ROLE_ADMIN),
        "in_house" | "in-house" | "in house" | "inhouse" => Some(ROLE_IN_HOUSE),
        "supervisor" | "sup" => Some(ROLE_SUPERVISOR),
        "coordinator" | "tlc" | "talent logistics coordinator" => Some(ROLE_COORDINATOR),
        "talent_escort" | "talent escort" | "escort" | "esc" => Some(ROLE_TALENT_ESCORT),
        _ => None,
    }
}
