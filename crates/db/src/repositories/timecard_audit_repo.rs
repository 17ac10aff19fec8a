//! Repository for the `timecard_audit_log` table.

use sqlx::PgPool;
use talentops_core::timecard::AuditEntry;
use talentops_core::types::DbId;

use crate::models::timecard::TimecardAuditRow;

const COLUMNS: &str = "id, timecard_id, change_id, field_name, old_value, new_value, \
    changed_by, changed_at, action_type, work_date";

/// Provides data access for timecard edit history.
pub struct TimecardAuditRepo;

impl TimecardAuditRepo {
    /// Audit trail of a timecard, newest change first.
    pub async fn list_by_timecard(
        pool: &PgPool,
        timecard_id: DbId,
    ) -> Result<Vec<TimecardAuditRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timecard_audit_log
             WHERE timecard_id = $1
             ORDER BY changed_at DESC, work_date, field_name"
        );
        sqlx::query_as::<_, TimecardAuditRow>(&query)
            .bind(timecard_id)
            .fetch_all(pool)
            .await
    }

    /// Rows belonging to one edit action.
    pub async fn list_by_change(
        pool: &PgPool,
        change_id: DbId,
    ) -> Result<Vec<TimecardAuditRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timecard_audit_log
             WHERE change_id = $1
             ORDER BY work_date, field_name"
        );
        sqlx::query_as::<_, TimecardAuditRow>(&query)
            .bind(change_id)
            .fetch_all(pool)
            .await
    }

    /// Insert audit rows inside the caller's transaction.
    pub(crate) async fn insert_many_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        entries: &[AuditEntry],
    ) -> Result<(), sqlx::Error> {
        for e in entries {
            sqlx::query(
                "INSERT INTO timecard_audit_log
                    (timecard_id, change_id, field_name, old_value, new_value,
                     changed_by, changed_at, action_type, work_date)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(e.timecard_id)
            .bind(e.change_id)
            .bind(&e.field_name)
            .bind(&e.old_value)
            .bind(&e.new_value)
            .bind(e.changed_by)
            .bind(e.changed_at)
            .bind(&e.action_type)
            .bind(e.work_date)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}
