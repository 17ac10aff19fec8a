//! Integration tests for daily assignment reconciliation against Postgres.
//!
//! Exercises the core reconciler through `PgAssignmentStore`:
//! - Migration round trip and idempotency
//! - Skipped assignments and escort integrity
//! - Date-range rejection and cross-project clashes
//! - Re-running after the bad input is fixed
//! - Rollback restoring schedules exactly

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;
use talentops_core::daily_assignment::{AssignmentEntity, DailyRow};
use talentops_core::error::CoreError;
use talentops_core::reconciler::{
    assign_day, migrate_project, replace_group_schedule, rollback_project, unassign_day,
    verify_project,
};
use talentops_core::types::{Date, DbId};
use talentops_db::models::profile::CreateProfile;
use talentops_db::models::project::{CreateProject, Project};
use talentops_db::models::talent::{CreateTalent, CreateTalentAssignment};
use talentops_db::models::talent_group::CreateTalentGroup;
use talentops_db::repositories::{
    DailyAssignmentRepo, ProfileRepo, ProjectRepo, TalentAssignmentRepo, TalentGroupRepo,
    TalentRepo,
};
use talentops_db::PgAssignmentStore;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn d(day: u32) -> Date {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

async fn project(pool: &PgPool) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Spring Gala".to_string(),
            start_date: d(10),
            end_date: d(20),
        },
    )
    .await
    .unwrap()
}

async fn escort(pool: &PgPool, name: &str) -> DbId {
    ProfileRepo::create(
        pool,
        &CreateProfile {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        },
    )
    .await
    .unwrap()
    .id
}

async fn talent_on(
    pool: &PgPool,
    project_id: DbId,
    escort_id: Option<DbId>,
    dates: Vec<Date>,
) -> DbId {
    let talent = TalentRepo::create(
        pool,
        &CreateTalent {
            first_name: "Ana".to_string(),
            last_name: "Silva".to_string(),
        },
    )
    .await
    .unwrap();
    TalentAssignmentRepo::create(
        pool,
        project_id,
        &CreateTalentAssignment {
            talent_id: talent.id,
            escort_id,
            scheduled_dates: dates,
        },
    )
    .await
    .unwrap();
    talent.id
}

async fn group_on(pool: &PgPool, project_id: DbId, escorts: Vec<DbId>, dates: Vec<Date>) -> DbId {
    TalentGroupRepo::create(
        pool,
        project_id,
        &CreateTalentGroup {
            group_name: "The Tumblers".to_string(),
            members: vec![],
            escort_ids: escorts,
            scheduled_dates: dates,
            point_of_contact_name: None,
            point_of_contact_phone: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn talent_schedule(pool: &PgPool, project_id: DbId, talent_id: DbId) -> Vec<Date> {
    TalentAssignmentRepo::find(pool, project_id, talent_id)
        .await
        .unwrap()
        .unwrap()
        .scheduled_dates
}

async fn group_schedule(pool: &PgPool, project_id: DbId, group_id: DbId) -> Vec<Date> {
    TalentGroupRepo::find_by_id(pool, project_id, group_id)
        .await
        .unwrap()
        .unwrap()
        .scheduled_dates
}

// ---------------------------------------------------------------------------
// Migration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_migration_round_trip(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let e2 = escort(&pool, "Esc2").await;
    let t = talent_on(&pool, p.id, Some(e1), vec![d(12), d(11), d(12)]).await;
    let g = group_on(&pool, p.id, vec![e1, e2], vec![d(15)]).await;
    let idle = talent_on(&pool, p.id, None, vec![d(13)]).await;

    let store = PgAssignmentStore::new(pool.clone());
    let window = p.window().unwrap();
    let summary = migrate_project(&store, &window, p.id, Uuid::new_v4()).await.unwrap();

    assert_eq!(summary.assignments, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 0);
    assert!(summary.snapshot_taken);

    assert_eq!(talent_schedule(&pool, p.id, t).await, vec![d(11), d(12)]);
    assert_eq!(group_schedule(&pool, p.id, g).await, vec![d(15)]);
    // Skipped assignments keep their schedule untouched.
    assert_eq!(talent_schedule(&pool, p.id, idle).await, vec![d(13)]);

    let group_rows = DailyAssignmentRepo::list_group_days(&pool, g, p.id).await.unwrap();
    assert_eq!(group_rows.len(), 2);

    assert!(verify_project(&store, p.id)
        .await
        .unwrap()
        .iter()
        .all(|m| m.entity == AssignmentEntity::Talent(idle)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_migration_is_idempotent(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    talent_on(&pool, p.id, Some(e1), vec![d(11), d(12)]).await;

    let store = PgAssignmentStore::new(pool.clone());
    let window = p.window().unwrap();
    migrate_project(&store, &window, p.id, Uuid::new_v4()).await.unwrap();
    let first = DailyAssignmentRepo::count_by_project(&pool, p.id).await.unwrap();

    let second = migrate_project(&store, &window, p.id, Uuid::new_v4()).await.unwrap();
    assert!(!second.snapshot_taken);
    assert_eq!(DailyAssignmentRepo::count_by_project(&pool, p.id).await.unwrap(), first);
    assert_eq!(first, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_dates_rejected_not_dropped(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let t = talent_on(&pool, p.id, Some(e1), vec![d(5), d(12), d(25)]).await;

    let store = PgAssignmentStore::new(pool.clone());
    let summary = migrate_project(&store, &p.window().unwrap(), p.id, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.rejected.len(), 2);
    assert_eq!(summary.schedules_deferred, 1);
    assert!(summary.remediation().is_some());
    assert_eq!(talent_schedule(&pool, p.id, t).await, vec![d(5), d(12), d(25)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rerun_after_widening_project_migrates_rejected_dates(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let t = talent_on(&pool, p.id, Some(e1), vec![d(25), d(12)]).await;
    let store = PgAssignmentStore::new(pool.clone());

    let first = migrate_project(&store, &p.window().unwrap(), p.id, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(first.rejected.len(), 1);

    sqlx::query("UPDATE projects SET end_date = $2 WHERE id = $1")
        .bind(p.id)
        .bind(d(30))
        .execute(&pool)
        .await
        .unwrap();
    let widened = ProjectRepo::find_by_id(&pool, p.id).await.unwrap().unwrap();

    let second = migrate_project(&store, &widened.window().unwrap(), p.id, Uuid::new_v4())
        .await
        .unwrap();

    assert!(second.rejected.is_empty());
    assert!(second.remediation().is_none());
    assert_eq!(talent_schedule(&pool, p.id, t).await, vec![d(12), d(25)]);
    assert_eq!(DailyAssignmentRepo::count_by_project(&pool, p.id).await.unwrap(), 2);
    assert!(verify_project(&store, p.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_talent_day_in_other_project_is_conflict_then_recovers(pool: PgPool) {
    let project_a = project(&pool).await;
    let project_b = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let t = talent_on(&pool, project_a.id, Some(e1), vec![d(12)]).await;
    TalentAssignmentRepo::create(
        &pool,
        project_b.id,
        &CreateTalentAssignment {
            talent_id: t,
            escort_id: Some(e1),
            scheduled_dates: vec![d(12), d(13)],
        },
    )
    .await
    .unwrap();
    let store = PgAssignmentStore::new(pool.clone());

    migrate_project(&store, &project_a.window().unwrap(), project_a.id, Uuid::new_v4())
        .await
        .unwrap();
    let summary = migrate_project(&store, &project_b.window().unwrap(), project_b.id, Uuid::new_v4())
        .await
        .unwrap();

    // The clash is reported per item and project A keeps its row.
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].date, Some(d(12)));
    assert!(summary.failures[0].error.contains("another project"));
    assert_eq!(DailyAssignmentRepo::count_by_project(&pool, project_a.id).await.unwrap(), 1);
    assert!(verify_project(&store, project_a.id).await.unwrap().is_empty());
    assert_eq!(talent_schedule(&pool, project_b.id, t).await, vec![d(12), d(13)]);

    // Free the date in project A, then re-run project B.
    unassign_day(&store, AssignmentEntity::Talent(t), project_a.id, d(12))
        .await
        .unwrap();
    let rerun = migrate_project(&store, &project_b.window().unwrap(), project_b.id, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(rerun.failed, 0);
    assert_eq!(talent_schedule(&pool, project_b.id, t).await, vec![d(12), d(13)]);
    assert_eq!(DailyAssignmentRepo::count_by_project(&pool, project_b.id).await.unwrap(), 2);
    assert!(verify_project(&store, project_b.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_escort_leaves_assignment_skipped(pool: PgPool) {
    let p = project(&pool).await;
    let good = escort(&pool, "Esc1").await;
    let ghost = escort(&pool, "Ghost").await;
    let t_good = talent_on(&pool, p.id, Some(good), vec![d(11)]).await;
    let t_bad = talent_on(&pool, p.id, Some(ghost), vec![d(12)]).await;

    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(ghost)
        .execute(&pool)
        .await
        .unwrap();

    let store = PgAssignmentStore::new(pool.clone());
    let summary = migrate_project(&store, &p.window().unwrap(), p.id, Uuid::new_v4())
        .await
        .unwrap();

    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(talent_schedule(&pool, p.id, t_good).await, vec![d(11)]);
    assert_eq!(talent_schedule(&pool, p.id, t_bad).await, vec![d(12)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_escort_must_exist(pool: PgPool) {
    let p = project(&pool).await;
    let g = group_on(&pool, p.id, vec![], vec![]).await;

    let err = TalentGroupRepo::set_escorts(&pool, g, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert_matches!(talentops_db::map_db_error(err), CoreError::Validation(_));
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rollback_restores_exactly(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let original = vec![d(13), d(11), d(13)];
    let t = talent_on(&pool, p.id, Some(e1), original.clone()).await;
    let g = group_on(&pool, p.id, vec![e1], vec![d(15), d(16)]).await;

    let store = PgAssignmentStore::new(pool.clone());
    migrate_project(&store, &p.window().unwrap(), p.id, Uuid::new_v4())
        .await
        .unwrap();
    assert_ne!(talent_schedule(&pool, p.id, t).await, original);

    let summary = rollback_project(&store, p.id).await.unwrap();
    assert_eq!(summary.schedules_restored, 2);
    assert_eq!(summary.rows_deleted, 4);

    assert_eq!(talent_schedule(&pool, p.id, t).await, original);
    assert_eq!(group_schedule(&pool, p.id, g).await, vec![d(15), d(16)]);
    assert_eq!(DailyAssignmentRepo::count_by_project(&pool, p.id).await.unwrap(), 0);

    let again = rollback_project(&store, p.id).await.unwrap();
    assert!(again.already_rolled_back);
}

// ---------------------------------------------------------------------------
// Direct assignment
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_outside_range_creates_no_row(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let t = talent_on(&pool, p.id, Some(e1), vec![]).await;

    let store = PgAssignmentStore::new(pool.clone());
    let row = DailyRow {
        entity: AssignmentEntity::Talent(t),
        project_id: p.id,
        assignment_date: d(21),
        escort_id: e1,
    };
    let err = assign_day(&store, &p.window().unwrap(), &row).await.unwrap_err();

    assert_matches!(err, CoreError::DateOutOfRange { .. });
    assert_eq!(DailyAssignmentRepo::count_by_project(&pool, p.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_replaces_escort_and_unassign_resyncs(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let e2 = escort(&pool, "Esc2").await;
    let t = talent_on(&pool, p.id, Some(e1), vec![]).await;

    let store = PgAssignmentStore::new(pool.clone());
    let window = p.window().unwrap();
    let row = |escort_id, day| DailyRow {
        entity: AssignmentEntity::Talent(t),
        project_id: p.id,
        assignment_date: d(day),
        escort_id,
    };

    assign_day(&store, &window, &row(e1, 12)).await.unwrap();
    let dates = assign_day(&store, &window, &row(e2, 12)).await.unwrap();
    assert_eq!(dates, vec![d(12)]);

    let rows = DailyAssignmentRepo::list_talent_days(&pool, t, p.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].escort_id, e2);

    let (removed, dates) = unassign_day(&store, AssignmentEntity::Talent(t), p.id, d(12))
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert!(dates.is_empty());
    assert!(talent_schedule(&pool, p.id, t).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_group_schedule(pool: PgPool) {
    let p = project(&pool).await;
    let e1 = escort(&pool, "Esc1").await;
    let e2 = escort(&pool, "Esc2").await;
    let g = group_on(&pool, p.id, vec![e1, e2], vec![]).await;

    let store = PgAssignmentStore::new(pool.clone());
    let window = p.window().unwrap();

    replace_group_schedule(&store, &window, g, p.id, &[d(11), d(12)], &[e1, e2])
        .await
        .unwrap();
    assert_eq!(DailyAssignmentRepo::list_group_days(&pool, g, p.id).await.unwrap().len(), 4);

    let dates = replace_group_schedule(&store, &window, g, p.id, &[d(12), d(13)], &[e1, e2])
        .await
        .unwrap();
    assert_eq!(dates, vec![d(12), d(13)]);
    assert_eq!(group_schedule(&pool, p.id, g).await, vec![d(12), d(13)]);

    // One bad date rejects the whole replacement.
    let err = replace_group_schedule(&store, &window, g, p.id, &[d(14), d(30)], &[e1])
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::DateOutOfRange { .. });
    assert_eq!(group_schedule(&pool, p.id, g).await, vec![d(12), d(13)]);
}
