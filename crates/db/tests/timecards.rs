//! Integration tests for timecard entries, totals, and audited edits.

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::PgPool;
use talentops_core::timecard::{
    build_audit_entries, diff_times, AuditContext, DailyTimes, DailyTimesPatch, EditAction,
    TimecardStatus,
};
use talentops_core::types::{Date, DbId, Timestamp};
use talentops_db::models::profile::CreateProfile;
use talentops_db::models::project::CreateProject;
use talentops_db::models::timecard::{CreateTimecard, TimecardHeader};
use talentops_db::repositories::timecard_repo::EditedDay;
use talentops_db::repositories::{ProfileRepo, ProjectRepo, TimecardAuditRepo, TimecardRepo};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn d(day: u32) -> Date {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn at(day: u32, h: u32, m: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, day, h, m, 0).unwrap()
}

fn shift(day: u32, from: u32, to: u32) -> DailyTimes {
    DailyTimes {
        check_in_time: Some(at(day, from, 0)),
        check_out_time: Some(at(day, to, 0)),
        ..Default::default()
    }
}

async fn setup(pool: &PgPool, pay_rate: f64) -> (DbId, TimecardHeader) {
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Spring Gala".to_string(),
            start_date: d(1),
            end_date: d(31),
        },
    )
    .await
    .unwrap();
    let user = ProfileRepo::create(
        pool,
        &CreateProfile {
            full_name: "Sam Staff".to_string(),
            email: "sam@example.com".to_string(),
        },
    )
    .await
    .unwrap();
    let header = TimecardRepo::create(
        pool,
        user.id,
        &CreateTimecard {
            project_id: project.id,
            period_start_date: d(9),
            period_end_date: d(15),
            pay_rate: None,
        },
        pay_rate,
    )
    .await
    .unwrap();
    (user.id, header)
}

async fn totals(pool: &PgPool, id: DbId) -> (f64, f64, f64) {
    let h = TimecardRepo::find_by_id(pool, id).await.unwrap().unwrap();
    (h.total_hours, h.total_break_duration, h.total_pay)
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_totals_follow_every_entry_change(pool: PgPool) {
    let (_, header) = setup(&pool, 20.0).await;

    TimecardRepo::upsert_entry(&pool, &header, d(9), &shift(9, 9, 17)).await.unwrap();
    TimecardRepo::upsert_entry(&pool, &header, d(10), &DailyTimes::default()).await.unwrap();
    TimecardRepo::upsert_entry(&pool, &header, d(11), &shift(11, 9, 17)).await.unwrap();
    assert_eq!(totals(&pool, header.id).await, (16.0, 0.0, 320.0));

    // Update: shorten day 11 to 4 hours.
    TimecardRepo::upsert_entry(&pool, &header, d(11), &shift(11, 9, 13)).await.unwrap();
    assert_eq!(totals(&pool, header.id).await, (12.0, 0.0, 240.0));

    // Delete day 9.
    assert!(TimecardRepo::delete_entry(&pool, header.id, d(9)).await.unwrap());
    assert_eq!(totals(&pool, header.id).await, (4.0, 0.0, 80.0));

    assert!(!TimecardRepo::delete_entry(&pool, header.id, d(9)).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inverted_times_store_zero(pool: PgPool) {
    let (_, header) = setup(&pool, 25.0).await;

    let entry = TimecardRepo::upsert_entry(&pool, &header, d(9), &shift(9, 17, 9))
        .await
        .unwrap();
    assert_eq!(entry.hours_worked, 0.0);
    assert_eq!(entry.daily_pay, 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recalculate_applies_current_pay_rate(pool: PgPool) {
    let (_, header) = setup(&pool, 10.0).await;
    TimecardRepo::upsert_entry(&pool, &header, d(9), &shift(9, 9, 17)).await.unwrap();

    sqlx::query("UPDATE timecard_headers SET pay_rate = 15 WHERE id = $1")
        .bind(header.id)
        .execute(&pool)
        .await
        .unwrap();

    let t = TimecardRepo::recalculate(&pool, header.id).await.unwrap().unwrap();
    assert_eq!(t.total_pay, 120.0);
    assert!(TimecardRepo::recalculate(&pool, Uuid::new_v4()).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_transition_guards_current_status(pool: PgPool) {
    let (user_id, header) = setup(&pool, 10.0).await;

    let submitted = TimecardRepo::transition(
        &pool,
        header.id,
        TimecardStatus::Draft,
        TimecardStatus::Submitted,
        user_id,
        None,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(submitted.status, "submitted");
    assert!(submitted.submitted_at.is_some());

    // Already submitted; a second draft->submitted claim finds nothing.
    let stale = TimecardRepo::transition(
        &pool,
        header.id,
        TimecardStatus::Draft,
        TimecardStatus::Submitted,
        user_id,
        None,
    )
    .await
    .unwrap();
    assert!(stale.is_none());

    let rejected = TimecardRepo::transition(
        &pool,
        header.id,
        TimecardStatus::Submitted,
        TimecardStatus::Rejected,
        user_id,
        Some("Missing lunch break"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Missing lunch break"));
}

// ---------------------------------------------------------------------------
// Audited edits
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_edit_audits_only_changed_fields(pool: PgPool) {
    let (user_id, header) = setup(&pool, 20.0).await;
    let before = DailyTimes {
        check_in_time: Some(at(12, 9, 0)),
        check_out_time: Some(at(12, 17, 0)),
        break_start_time: Some(at(12, 12, 0)),
        break_end_time: Some(at(12, 12, 30)),
    };
    TimecardRepo::upsert_entry(&pool, &header, d(12), &before).await.unwrap();
    let header = TimecardRepo::transition(
        &pool,
        header.id,
        TimecardStatus::Draft,
        TimecardStatus::Submitted,
        user_id,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let patch = DailyTimesPatch {
        check_in_time: Some(at(12, 9, 0)),
        break_start_time: Some(at(12, 12, 30)),
        ..Default::default()
    };
    let after = patch.apply(&before);
    let changes = diff_times(&before, &after);
    let ctx = AuditContext {
        timecard_id: header.id,
        change_id: Uuid::new_v4(),
        changed_by: user_id,
        changed_at: Utc::now(),
        action: EditAction::AdminEdit,
    };
    let audit = build_audit_entries(&ctx, d(12), &changes);

    let updated = TimecardRepo::apply_edit(
        &pool,
        &header,
        TimecardStatus::Submitted,
        TimecardStatus::Submitted,
        &[EditedDay {
            work_date: d(12),
            times: after,
        }],
        &audit,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    // Break shrank to zero, so the full 8 hours count.
    assert_eq!(updated.total_hours, 8.0);
    assert_eq!(updated.status, "submitted");

    let rows = TimecardAuditRepo::list_by_timecard(&pool, header.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field_name, "break_start_time");
    assert_eq!(rows[0].action_type, "admin_edit");
    assert_eq!(rows[0].work_date, d(12));
    assert_eq!(rows[0].old_value.as_deref(), Some("2026-03-12T12:00:00Z"));
    assert_eq!(rows[0].new_value.as_deref(), Some("2026-03-12T12:30:00Z"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_rows_share_change_id(pool: PgPool) {
    let (user_id, header) = setup(&pool, 20.0).await;
    let ctx = AuditContext {
        timecard_id: header.id,
        change_id: Uuid::new_v4(),
        changed_by: user_id,
        changed_at: Utc::now(),
        action: EditAction::UserEdit,
    };

    let mut days = Vec::new();
    let mut audit = Vec::new();
    for day in [9, 10] {
        let after = shift(day, 8, 16);
        audit.extend(build_audit_entries(
            &ctx,
            d(day),
            &diff_times(&DailyTimes::default(), &after),
        ));
        days.push(EditedDay {
            work_date: d(day),
            times: after,
        });
    }

    TimecardRepo::apply_edit(
        &pool,
        &header,
        TimecardStatus::Draft,
        TimecardStatus::Draft,
        &days,
        &audit,
        None,
    )
    .await
    .unwrap()
    .unwrap();

    let rows = TimecardAuditRepo::list_by_change(&pool, ctx.change_id).await.unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.change_id == ctx.change_id));
    assert_eq!(totals(&pool, header.id).await.0, 16.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_against_stale_status_writes_nothing(pool: PgPool) {
    let (_, header) = setup(&pool, 20.0).await;
    let result = TimecardRepo::apply_edit(
        &pool,
        &header,
        TimecardStatus::Submitted,
        TimecardStatus::Rejected,
        &[EditedDay {
            work_date: d(9),
            times: shift(9, 9, 17),
        }],
        &[],
        Some("late"),
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert!(TimecardRepo::list_entries(&pool, header.id).await.unwrap().is_empty());
    let h = TimecardRepo::find_by_id(&pool, header.id).await.unwrap().unwrap();
    assert_eq!(h.status, "draft");
}
