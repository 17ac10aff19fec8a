/// All database primary keys are PostgreSQL UUIDs (`gen_random_uuid()`).
///
/// Identities come from the external auth provider as UUIDs, so every other
/// table follows the same key type.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (project windows, schedules, work dates) carry no zone.
pub type Date = chrono::NaiveDate;
