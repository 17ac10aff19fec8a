//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod daily_assignment_repo;
pub mod location_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod readiness_repo;
pub mod role_template_repo;
pub mod snapshot_repo;
pub mod talent_assignment_repo;
pub mod talent_group_repo;
pub mod talent_repo;
pub mod team_repo;
pub mod timecard_audit_repo;
pub mod timecard_repo;

pub use daily_assignment_repo::DailyAssignmentRepo;
pub use location_repo::LocationRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use readiness_repo::ReadinessRepo;
pub use role_template_repo::RoleTemplateRepo;
pub use snapshot_repo::SnapshotRepo;
pub use talent_assignment_repo::TalentAssignmentRepo;
pub use talent_group_repo::TalentGroupRepo;
pub use talent_repo::TalentRepo;
pub use team_repo::TeamRepo;
pub use timecard_audit_repo::TimecardAuditRepo;
pub use timecard_repo::TimecardRepo;
