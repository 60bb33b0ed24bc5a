use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, UserAtQuery, UserQuery};
use crate::error::ApiError;
use crate::models::{DateNightRecord, NewDateNight};
use crate::streak::compute_streak;

#[derive(Deserialize)]
pub struct LogDateNightRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub date_night: NewDateNight,
}

#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub streak: u32,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/date-nights", post(log_date_night).get(list_date_nights))
        .route("/date-nights/streak", get(get_streak))
        .with_state(state)
}

async fn log_date_night(
    State(state): State<AppState>,
    Json(body): Json<LogDateNightRequest>,
) -> Result<(StatusCode, Json<DateNightRecord>), ApiError> {
    let record = state.store.create_date_night(body.user_id, body.date_night).await?;
    tracing::info!("💞 Date night {} logged for user {}", record.id, record.user_id);
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_date_nights(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<DateNightRecord>>, ApiError> {
    let nights = state.store.list_date_nights(query.user_id).await?;
    Ok(Json(nights))
}

async fn get_streak(
    State(state): State<AppState>,
    Query(query): Query<UserAtQuery>,
) -> Result<Json<StreakResponse>, ApiError> {
    let nights = state.store.list_date_nights(query.user_id).await?;
    Ok(Json(StreakResponse { streak: compute_streak(&nights, query.now()) }))
}
