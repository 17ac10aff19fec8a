use std::sync::Arc;

use talentops_db::PgAssignmentStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and config are reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: talentops_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assignment store over this state's pool, for reconciler operations.
    pub fn assignment_store(&self) -> PgAssignmentStore {
        PgAssignmentStore::new(self.pool.clone())
    }
}
