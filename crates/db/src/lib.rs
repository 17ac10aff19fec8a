//! Postgres persistence for talent scheduling, timecards, and readiness.

pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;
use talentops_core::error::CoreError;

pub use store::PgAssignmentStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Translate a database error into a domain error.
///
/// Unique violations become conflicts, foreign-key, check, and not-null
/// violations become validation errors. Everything else is internal.
pub fn map_db_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some("23505") => CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                )),
                Some("23503") => CoreError::Validation(format!(
                    "Referenced row does not exist ({constraint})"
                )),
                Some("23514") => {
                    CoreError::Validation(format!("Value violates check constraint: {constraint}"))
                }
                Some("23502") => CoreError::Validation(db_err.message().to_string()),
                _ => CoreError::Internal(err.to_string()),
            }
        }
        _ => CoreError::Internal(err.to_string()),
    }
}
