//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - An update DTO (all `Option` fields) where the entity can be patched

pub mod daily_assignment;
pub mod location;
pub mod profile;
pub mod project;
pub mod readiness;
pub mod role_template;
pub mod snapshot;
pub mod talent;
pub mod talent_group;
pub mod team;
pub mod timecard;
