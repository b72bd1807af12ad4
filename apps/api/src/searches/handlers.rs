use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::report::average_viability;
use crate::errors::AppError;
use crate::models::search::SearchRow;
use crate::searches::stats::{category_breakdown, compute_dashboard, CategoryShare, Dashboard};
use crate::searches::store;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub searches: Vec<SearchRow>,
    pub categories: Vec<CategoryShare>,
}

#[derive(Serialize)]
pub struct SearchDetailResponse {
    #[serde(flatten)]
    pub search: SearchRow,
    pub average_viability: Option<i64>,
}

/// GET /api/v1/analyses
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let searches = store::list_searches(&state.db, params.user_id).await?;
    let categories = category_breakdown(&searches);
    Ok(Json(HistoryResponse {
        searches,
        categories,
    }))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SearchDetailResponse>, AppError> {
    let search = store::get_search(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Search {id} not found")))?;

    let average_viability = stored_report(&search)?.and_then(average_viability);
    Ok(Json(SearchDetailResponse {
        average_viability,
        search,
    }))
}

/// The stored report, or a local 422 when it is missing or not an object.
fn stored_report(search: &SearchRow) -> Result<Option<&Value>, AppError> {
    match &search.result {
        Some(report @ Value::Object(_)) => Ok(Some(report)),
        Some(_) => Err(AppError::UnprocessableEntity(format!(
            "Stored result for search {} is not a JSON object",
            search.id
        ))),
        None => Err(AppError::UnprocessableEntity(format!(
            "Search {} has no stored result",
            search.id
        ))),
    }
}

/// DELETE /api/v1/analyses/:id
pub async fn handle_delete_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !store::delete_search(&state.db, params.user_id, id).await? {
        return Err(AppError::NotFound(format!("Search {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Dashboard>, AppError> {
    if !store::is_staff(&state.db, params.user_id).await? {
        return Err(AppError::Forbidden);
    }
    let rows = store::list_all_searches(&state.db).await?;
    let total_users = store::count_users(&state.db).await?;
    Ok(Json(compute_dashboard(&rows, total_users, Utc::now())))
}
