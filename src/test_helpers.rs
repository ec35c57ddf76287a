use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, MockDatabase};

use crate::{routes::router, state::AppState};

/// Router over an empty mock database, for tests that never reach the store.
pub fn test_router() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = AppState::new(db);
    router(Arc::clone(&state))
}

/// Router over a prepared mock database.
pub fn test_router_with(db: sea_orm::DatabaseConnection) -> Router {
    let state = AppState::new(db);
    router(Arc::clone(&state))
}
