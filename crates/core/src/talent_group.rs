//! Talent group validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_GROUP_NAME_LENGTH: usize = 100;
pub const MAX_MEMBER_FIELD_LENGTH: usize = 100;
pub const MIN_PHONE_DIGITS: usize = 7;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Digits plus the usual formatting characters.
static PHONE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-(). ]+$").expect("valid regex"));

/// One person in a talent group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl GroupMember {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Validate a group name. Returns the trimmed name.
pub fn validate_group_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Group name must not be empty".to_string());
    }
    if trimmed.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(format!(
            "Group name must be at most {MAX_GROUP_NAME_LENGTH} characters"
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate the members of a group.
pub fn validate_members(members: &[GroupMember]) -> Result<(), String> {
    for (i, m) in members.iter().enumerate() {
        if m.first_name.trim().is_empty() && m.last_name.trim().is_empty() {
            return Err(format!("Member {} needs a first or last name", i + 1));
        }
        let too_long = [Some(&m.first_name), Some(&m.last_name), m.role.as_ref()]
            .into_iter()
            .flatten()
            .any(|v| v.chars().count() > MAX_MEMBER_FIELD_LENGTH);
        if too_long {
            return Err(format!(
                "Member {} fields must be at most {MAX_MEMBER_FIELD_LENGTH} characters",
                i + 1
            ));
        }
    }
    Ok(())
}

/// Validate a point-of-contact phone number.
pub fn validate_phone(phone: &str) -> Result<(), String> {
    let trimmed = phone.trim();
    if !PHONE_CHARS_RE.is_match(trimmed) {
        return Err(format!("Phone number '{phone}' contains invalid characters"));
    }
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(format!(
            "Phone number must contain {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits"
        ));
    }
    Ok(())
}
