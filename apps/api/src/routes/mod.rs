pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::searches::handlers as searches;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/analyses",
            post(analysis::handle_analyze).get(searches::handle_history),
        )
        .route(
            "/api/v1/analyses/:id",
            get(searches::handle_get_search).delete(searches::handle_delete_search),
        )
        .route("/api/v1/dashboard", get(searches::handle_dashboard))
        .with_state(state)
}
