use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};

use super::{AppState, UserQuery};
use crate::error::ApiError;
use crate::models::CycleStats;
use crate::stats::cycle_stats;

pub async fn get_cycle_stats(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CycleStats>, ApiError> {
    let history = state.store.list_periods(query.user_id, None).await?;
    Ok(Json(cycle_stats(&history)))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle-stats", get(get_cycle_stats))
        .with_state(state)
}
