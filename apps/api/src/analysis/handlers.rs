use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::analysis::classifier::classify;
use crate::analysis::prompts::{problem_text, validate_problem};
use crate::analysis::report::FeasibilityReport;
use crate::errors::AppError;
use crate::models::search::NewSearch;
use crate::searches::store::insert_search;
use crate::state::AppState;

const DEFAULT_MODEL: &str = "gemini";

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub user_id: Uuid,
    /// Raw JSON so a non-string problem is reported as a type error, not a 422.
    #[serde(default)]
    pub problem: Option<Value>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub search_id: Uuid,
    pub category: String,
    pub report: FeasibilityReport,
    pub average_viability: i64,
}

/// Trimmed, lower-cased selector; absent or blank means gemini.
fn model_selector(model: Option<&str>) -> String {
    match model.map(str::trim) {
        Some(model) if !model.is_empty() => model.to_lowercase(),
        _ => DEFAULT_MODEL.to_string(),
    }
}

/// POST /api/v1/analyses
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<(StatusCode, Json<AnalyzeResponse>), AppError> {
    let problem = validate_problem(problem_text(req.problem.as_ref())?)?;
    let model = model_selector(req.model.as_deref());

    let document = state.analyzer.analyze(&model, problem).await?;
    let report = FeasibilityReport::from_value(document)?;
    let category = classify(problem);

    let result = serde_json::to_value(&report)
        .map_err(|e| AppError::Analysis(format!("Could not serialize report: {e}")))?;
    let search = insert_search(
        &state.db,
        NewSearch {
            user_id: req.user_id,
            problem_text: problem,
            provider: &model,
            category: category.label(),
            result: &result,
        },
    )
    .await?;

    info!(
        "Stored analysis {} ({}, {category})",
        search.id, search.provider
    );

    Ok((
        StatusCode::CREATED,
        Json(AnalyzeResponse {
            search_id: search.id,
            category: search.category,
            average_viability: report.average_viability(),
            report,
        }),
    ))
}
