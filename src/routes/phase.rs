use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::{AppState, UserAtQuery};
use crate::calendar::{build_markers, MarkedDates};
use crate::error::ApiError;
use crate::models::PhaseResult;
use crate::phase::{average_cycle_length, compute_phase};

#[derive(Debug, Serialize)]
pub struct PhaseResponse {
    #[serde(flatten)]
    pub result: PhaseResult,
    pub average_cycle_length: i64,
    pub has_logged_period: bool,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/phase", get(get_phase))
        .route("/calendar", get(get_calendar))
        .with_state(state)
}

async fn get_phase(
    State(state): State<AppState>,
    Query(query): Query<UserAtQuery>,
) -> Result<Json<PhaseResponse>, ApiError> {
    let history = state
        .store
        .list_periods(query.user_id, Some(state.phase_history_limit))
        .await?;

    let result = compute_phase(&history, query.now());
    tracing::debug!("🧠 User {} is in phase {:?}", query.user_id, result.phase());

    Ok(Json(PhaseResponse {
        result,
        average_cycle_length: average_cycle_length(&history),
        has_logged_period: !history.is_empty(),
    }))
}

async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<UserAtQuery>,
) -> Result<Json<MarkedDates>, ApiError> {
    let mut history = state.store.list_periods(query.user_id, None).await?;
    // Oldest first, so newer periods win on shared days.
    history.reverse();
    Ok(Json(build_markers(&history, query.now())))
}
