use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::service::FeasibilityService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub analyzer: Arc<FeasibilityService>,
}
