//! Repository for the `timecard_headers` and `timecard_daily_entries` tables.
//!
//! Header totals are recomputed in the same transaction as every entry
//! insert, update, or delete.

use sqlx::PgPool;
use talentops_core::timecard::{
    compute_daily, sum_totals, AuditEntry, DailyFigures, DailyTimes, TimecardStatus,
    TimecardTotals, STATUS_APPROVED, STATUS_REJECTED, STATUS_SUBMITTED,
};
use talentops_core::types::{Date, DbId};

use crate::models::timecard::{
    CreateTimecard, TimecardDailyEntry, TimecardHeader, TimecardWithEntries,
};
use crate::repositories::TimecardAuditRepo;

/// Column list for timecard_headers queries.
const COLUMNS: &str = "id, user_id, project_id, status, period_start_date, period_end_date, \
    pay_rate, total_hours, total_break_duration, total_pay, submitted_at, approved_at, \
    approved_by, rejection_reason, created_at, updated_at";

/// Column list for timecard_daily_entries queries.
const ENTRY_COLUMNS: &str = "id, timecard_header_id, work_date, check_in_time, check_out_time, \
    break_start_time, break_end_time, hours_worked, break_duration, daily_pay, \
    created_at, updated_at";

type PgTx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// A day to write as part of an audited edit.
#[derive(Debug, Clone, Copy)]
pub struct EditedDay {
    pub work_date: Date,
    pub times: DailyTimes,
}

/// Provides data access for timecards.
pub struct TimecardRepo;

impl TimecardRepo {
    // -----------------------------------------------------------------------
    // Headers
    // -----------------------------------------------------------------------

    /// Insert a draft timecard for `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTimecard,
        pay_rate: f64,
    ) -> Result<TimecardHeader, sqlx::Error> {
        let query = format!(
            "INSERT INTO timecard_headers
                (user_id, project_id, period_start_date, period_end_date, pay_rate)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimecardHeader>(&query)
            .bind(user_id)
            .bind(input.project_id)
            .bind(input.period_start_date)
            .bind(input.period_end_date)
            .bind(pay_rate)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TimecardHeader>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM timecard_headers WHERE id = $1");
        sqlx::query_as::<_, TimecardHeader>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a header with its entries.
    pub async fn find_with_entries(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TimecardWithEntries>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(header) => {
                let entries = Self::list_entries(pool, id).await?;
                Ok(Some(TimecardWithEntries { header, entries }))
            }
            None => Ok(None),
        }
    }

    /// Timecard IDs, optionally limited to one project.
    pub async fn list_ids(pool: &PgPool, project_id: Option<DbId>) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM timecard_headers
             WHERE ($1::uuid IS NULL OR project_id = $1)
             ORDER BY created_at, id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Move a timecard from `from` to `to`.
    ///
    /// Returns `None` if the timecard is no longer in `from`, so a concurrent
    /// transition is never overwritten.
    pub async fn transition(
        pool: &PgPool,
        id: DbId,
        from: TimecardStatus,
        to: TimecardStatus,
        actor: DbId,
        reason: Option<&str>,
    ) -> Result<Option<TimecardHeader>, sqlx::Error> {
        let query = format!(
            "UPDATE timecard_headers SET
                status = $3,
                submitted_at = CASE WHEN $3 = '{STATUS_SUBMITTED}' THEN NOW() ELSE submitted_at END,
                approved_at = CASE WHEN $3 = '{STATUS_APPROVED}' THEN NOW() ELSE approved_at END,
                approved_by = CASE WHEN $3 = '{STATUS_APPROVED}' THEN $4 ELSE approved_by END,
                rejection_reason = CASE WHEN $3 = '{STATUS_REJECTED}' THEN $5 ELSE rejection_reason END
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimecardHeader>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(actor)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Entries
    // -----------------------------------------------------------------------

    pub async fn list_entries(
        pool: &PgPool,
        header_id: DbId,
    ) -> Result<Vec<TimecardDailyEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM timecard_daily_entries
             WHERE timecard_header_id = $1
             ORDER BY work_date"
        );
        sqlx::query_as::<_, TimecardDailyEntry>(&query)
            .bind(header_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_entry(
        pool: &PgPool,
        header_id: DbId,
        work_date: Date,
    ) -> Result<Option<TimecardDailyEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM timecard_daily_entries
             WHERE timecard_header_id = $1 AND work_date = $2"
        );
        sqlx::query_as::<_, TimecardDailyEntry>(&query)
            .bind(header_id)
            .bind(work_date)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace one day and recompute the header totals.
    pub async fn upsert_entry(
        pool: &PgPool,
        header: &TimecardHeader,
        work_date: Date,
        times: &DailyTimes,
    ) -> Result<TimecardDailyEntry, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let figures = compute_daily(times, header.pay_rate);
        let entry = Self::write_entry_inner(&mut tx, header.id, work_date, times, &figures).await?;
        Self::recompute_totals_inner(&mut tx, header.id).await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Delete one day and recompute the header totals.
    pub async fn delete_entry(
        pool: &PgPool,
        header_id: DbId,
        work_date: Date,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query(
            "DELETE FROM timecard_daily_entries
             WHERE timecard_header_id = $1 AND work_date = $2",
        )
        .bind(header_id)
        .bind(work_date)
        .execute(&mut *tx)
        .await?;
        Self::recompute_totals_inner(&mut tx, header_id).await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply an edit: write the days, log the audit rows, set the status,
    /// and recompute totals, all in one transaction.
    ///
    /// Returns `None` if the timecard left `expected` in the meantime.
    pub async fn apply_edit(
        pool: &PgPool,
        header: &TimecardHeader,
        expected: TimecardStatus,
        next: TimecardStatus,
        days: &[EditedDay],
        audit: &[AuditEntry],
        rejection_reason: Option<&str>,
    ) -> Result<Option<TimecardHeader>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let claimed: Option<(DbId,)> = sqlx::query_as(
            "UPDATE timecard_headers SET
                status = $3,
                rejection_reason = COALESCE($4, rejection_reason)
             WHERE id = $1 AND status = $2
             RETURNING id",
        )
        .bind(header.id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .bind(rejection_reason)
        .fetch_optional(&mut *tx)
        .await?;

        if claimed.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        for day in days {
            let figures = compute_daily(&day.times, header.pay_rate);
            Self::write_entry_inner(&mut tx, header.id, day.work_date, &day.times, &figures)
                .await?;
        }

        TimecardAuditRepo::insert_many_inner(&mut tx, audit).await?;
        Self::recompute_totals_inner(&mut tx, header.id).await?;

        let query = format!("SELECT {COLUMNS} FROM timecard_headers WHERE id = $1");
        let updated = sqlx::query_as::<_, TimecardHeader>(&query)
            .bind(header.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    // -----------------------------------------------------------------------
    // Totals
    // -----------------------------------------------------------------------

    /// Recompute every entry from its raw times at the header's pay rate,
    /// then the header totals. Returns the new totals, or `None` if the
    /// timecard does not exist.
    pub async fn recalculate(pool: &PgPool, id: DbId) -> Result<Option<TimecardTotals>, sqlx::Error> {
        let Some(header) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let entries = Self::list_entries(pool, id).await?;

        let mut tx = pool.begin().await?;
        for entry in &entries {
            let times = entry.times();
            let figures = compute_daily(&times, header.pay_rate);
            Self::write_entry_inner(&mut tx, id, entry.work_date, &times, &figures).await?;
        }
        let totals = Self::recompute_totals_inner(&mut tx, id).await?;
        tx.commit().await?;

        Ok(Some(totals))
    }

    async fn write_entry_inner(
        tx: &mut PgTx<'_>,
        header_id: DbId,
        work_date: Date,
        times: &DailyTimes,
        figures: &DailyFigures,
    ) -> Result<TimecardDailyEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO timecard_daily_entries
                (timecard_header_id, work_date, check_in_time, check_out_time,
                 break_start_time, break_end_time, hours_worked, break_duration, daily_pay)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (timecard_header_id, work_date) DO UPDATE SET
                check_in_time = EXCLUDED.check_in_time,
                check_out_time = EXCLUDED.check_out_time,
                break_start_time = EXCLUDED.break_start_time,
                break_end_time = EXCLUDED.break_end_time,
                hours_worked = EXCLUDED.hours_worked,
                break_duration = EXCLUDED.break_duration,
                daily_pay = EXCLUDED.daily_pay
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, TimecardDailyEntry>(&query)
            .bind(header_id)
            .bind(work_date)
            .bind(times.check_in_time)
            .bind(times.check_out_time)
            .bind(times.break_start_time)
            .bind(times.break_end_time)
            .bind(figures.hours_worked)
            .bind(figures.break_duration)
            .bind(figures.daily_pay)
            .fetch_one(&mut **tx)
            .await
    }

    async fn recompute_totals_inner(
        tx: &mut PgTx<'_>,
        header_id: DbId,
    ) -> Result<TimecardTotals, sqlx::Error> {
        let rows: Vec<(f64, f64, f64)> = sqlx::query_as(
            "SELECT hours_worked, break_duration, daily_pay
             FROM timecard_daily_entries
             WHERE timecard_header_id = $1",
        )
        .bind(header_id)
        .fetch_all(&mut **tx)
        .await?;

        let figures: Vec<DailyFigures> = rows
            .into_iter()
            .map(|(hours_worked, break_duration, daily_pay)| DailyFigures {
                hours_worked,
                break_duration,
                daily_pay,
            })
            .collect();
        let totals = sum_totals(&figures);

        sqlx::query(
            "UPDATE timecard_headers SET
                total_hours = $2,
                total_break_duration = $3,
                total_pay = $4
             WHERE id = $1",
        )
        .bind(header_id)
        .bind(totals.total_hours)
        .bind(totals.total_break_duration)
        .bind(totals.total_pay)
        .execute(&mut **tx)
        .await?;

        Ok(totals)
    }
}
