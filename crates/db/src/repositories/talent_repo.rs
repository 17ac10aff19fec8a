//! Repository for the `talent` table.

use sqlx::PgPool;
use talentops_core::types::DbId;

use crate::models::talent::{CreateTalent, Talent};

const COLUMNS: &str = "id, first_name, last_name, created_at, updated_at";

/// Provides data access for talent records.
pub struct TalentRepo;

impl TalentRepo {
    pub async fn create(pool: &PgPool, input: &CreateTalent) -> Result<Talent, sqlx::Error> {
        let query = format!(
            "INSERT INTO talent (first_name, last_name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Talent>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Talent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM talent WHERE id = $1");
        sqlx::query_as::<_, Talent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
