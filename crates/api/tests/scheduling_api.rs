//! HTTP-level tests for talent assignments, daily escort days, and groups.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_admin, create_project, create_user, delete, get, post_json, put_json,
};
use sqlx::PgPool;
use talentops_db::repositories::DailyAssignmentRepo;
use uuid::Uuid;

/// Create talent and return its id.
async fn create_talent(pool: &PgPool, token: &str) -> String {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/talent",
        token,
        serde_json::json!({ "first_name": "Mia", "last_name": "Moss" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_str().unwrap().to_string()
}

fn project_uuid(id: &str) -> Uuid {
    id.parse().unwrap()
}

// ---------------------------------------------------------------------------
// Talent assignments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_talent_with_schedule_creates_daily_rows(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_id, _) = create_user(&pool, "Eve Escort", "talent_escort").await;
    let talent_id = create_talent(&pool, &token).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent"),
        &token,
        serde_json::json!({
            "talent_id": talent_id,
            "escort_id": escort_id,
            "scheduled_dates": ["2026-03-12", "2026-03-10", "2026-03-12"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["scheduled_dates"],
        serde_json::json!(["2026-03-10", "2026-03-12"])
    );

    let rows = DailyAssignmentRepo::count_by_project(&pool, project_uuid(&project_id))
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_without_escort_rejected(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let talent_id = create_talent(&pool, &token).await;

    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/talent"),
        &token,
        serde_json::json!({ "talent_id": talent_id, "scheduled_dates": ["2026-03-10"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Daily escort days
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_assign_and_unassign_day(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_id, _) = create_user(&pool, "Eve Escort", "talent_escort").await;
    let talent_id = create_talent(&pool, &token).await;
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent"),
        &token,
        serde_json::json!({ "talent_id": talent_id }),
    )
    .await;

    let day_uri = format!("/api/v1/projects/{project_id}/talent/{talent_id}/days/2026-03-15");
    let response = put_json(
        common::build_test_app(pool.clone()),
        &day_uri,
        &token,
        serde_json::json!({ "escort_id": escort_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["scheduled_dates"], serde_json::json!(["2026-03-15"]));

    let response = delete(common::build_test_app(pool.clone()), &day_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["removed"], 1);
    assert_eq!(json["data"]["scheduled_dates"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_day_outside_project_range_creates_no_row(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_id, _) = create_user(&pool, "Eve Escort", "talent_escort").await;
    let talent_id = create_talent(&pool, &token).await;
    post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent"),
        &token,
        serde_json::json!({ "talent_id": talent_id }),
    )
    .await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent/{talent_id}/days/2026-04-02"),
        &token,
        serde_json::json!({ "escort_id": escort_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "DATE_OUT_OF_RANGE");

    let rows = DailyAssignmentRepo::count_by_project(&pool, project_uuid(&project_id))
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_day_for_unassigned_talent_returns_404(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_id, _) = create_user(&pool, "Eve Escort", "talent_escort").await;
    let talent_id = create_talent(&pool, &token).await;

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/talent/{talent_id}/days/2026-03-15"),
        &token,
        serde_json::json!({ "escort_id": escort_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Talent groups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_group_with_schedule(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_a, _) = create_user(&pool, "Eve Escort", "talent_escort").await;
    let (escort_b, _) = create_user(&pool, "Ed Escort", "talent_escort").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent-groups"),
        &token,
        serde_json::json!({
            "group_name": "  The Tumblers ",
            "members": [
                { "first_name": "Ana", "last_name": "Silva", "role": "Lead" },
                { "first_name": "Bo", "last_name": "Chen" }
            ],
            "escort_ids": [escort_a, escort_b],
            "scheduled_dates": ["2026-03-10", "2026-03-11"],
            "point_of_contact_phone": "+1 (555) 123-4567",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["group_name"], "The Tumblers");
    assert_eq!(json["data"]["members"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["data"]["scheduled_dates"],
        serde_json::json!(["2026-03-10", "2026-03-11"])
    );

    // Two dates times two escorts.
    let rows = DailyAssignmentRepo::count_by_project(&pool, project_uuid(&project_id))
        .await
        .unwrap();
    assert_eq!(rows, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_group_validation_errors(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let uri = format!("/api/v1/projects/{project_id}/talent-groups");

    let blank_name = post_json(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        serde_json::json!({ "group_name": "   " }),
    )
    .await;
    assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);

    let bad_phone = post_json(
        common::build_test_app(pool.clone()),
        &uri,
        &token,
        serde_json::json!({ "group_name": "Choir", "point_of_contact_phone": "call me" }),
    )
    .await;
    assert_eq!(bad_phone.status(), StatusCode::BAD_REQUEST);

    let no_escort = post_json(
        common::build_test_app(pool),
        &uri,
        &token,
        serde_json::json!({ "group_name": "Choir", "scheduled_dates": ["2026-03-10"] }),
    )
    .await;
    assert_eq!(no_escort.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_group_escorts_rewrites_rows(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_a, _) = create_user(&pool, "Eve Escort", "talent_escort").await;
    let (escort_b, _) = create_user(&pool, "Ed Escort", "talent_escort").await;

    let created = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent-groups"),
        &token,
        serde_json::json!({
            "group_name": "Choir",
            "escort_ids": [escort_a],
            "scheduled_dates": ["2026-03-10", "2026-03-11"],
        }),
    )
    .await;
    let group_id = body_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent-groups/{group_id}"),
        &token,
        serde_json::json!({ "escort_ids": [escort_a, escort_b] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["escort_ids"].as_array().unwrap().len(), 2);

    let rows = DailyAssignmentRepo::list_group_days(
        &pool,
        group_id.parse().unwrap(),
        project_uuid(&project_id),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_replace_group_schedule(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_id, _) = create_user(&pool, "Eve Escort", "talent_escort").await;

    let created = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent-groups"),
        &token,
        serde_json::json!({
            "group_name": "Choir",
            "escort_ids": [escort_id],
            "scheduled_dates": ["2026-03-10", "2026-03-11"],
        }),
    )
    .await;
    let group_id = body_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let schedule_uri = format!("/api/v1/projects/{project_id}/talent-groups/{group_id}/schedule");

    let response = put_json(
        common::build_test_app(pool.clone()),
        &schedule_uri,
        &token,
        serde_json::json!({ "scheduled_dates": ["2026-03-11", "2026-03-20"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["scheduled_dates"],
        serde_json::json!(["2026-03-11", "2026-03-20"])
    );

    // A bad date fails the whole request and leaves the schedule alone.
    let response = put_json(
        common::build_test_app(pool.clone()),
        &schedule_uri,
        &token,
        serde_json::json!({ "scheduled_dates": ["2026-03-12", "2026-05-01"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/projects/{project_id}/talent-groups/{group_id}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["scheduled_dates"],
        serde_json::json!(["2026-03-11", "2026-03-20"])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_group_removes_rows(pool: PgPool) {
    let (_, token) = create_admin(&pool).await;
    let project_id = create_project(&pool, &token).await;
    let (escort_id, _) = create_user(&pool, "Eve Escort", "talent_escort").await;

    let created = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent-groups"),
        &token,
        serde_json::json!({
            "group_name": "Choir",
            "escort_ids": [escort_id],
            "scheduled_dates": ["2026-03-10"],
        }),
    )
    .await;
    let group_id = body_json(created).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/talent-groups/{group_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let rows = DailyAssignmentRepo::count_by_project(&pool, project_uuid(&project_id))
        .await
        .unwrap();
    assert_eq!(rows, 0);
}
