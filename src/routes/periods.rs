use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, UserQuery};
use crate::error::ApiError;
use crate::models::{NewPeriod, PeriodRecord};
use crate::phase::active_period;

#[derive(Deserialize)]
pub struct CreatePeriodRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub period: NewPeriod,
}

#[derive(Deserialize)]
pub struct EndPeriodRequest {
    pub user_id: Uuid,
    pub end_date: DateTime<Utc>,
    pub notes: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/periods", post(create_period).get(list_periods))
        .route("/periods/active", get(get_active_period))
        .route("/periods/:id/end", patch(end_period))
        .with_state(state)
}

async fn create_period(
    State(state): State<AppState>,
    Json(body): Json<CreatePeriodRequest>,
) -> Result<(StatusCode, Json<PeriodRecord>), ApiError> {
    let record = state.store.create_period(body.user_id, body.period).await?;
    tracing::info!("🩸 Period {} started for user {}", record.id, record.user_id);

    Ok((StatusCode::CREATED, Json(record)))
}

async fn end_period(
    State(state): State<AppState>,
    Path(period_id): Path<Uuid>,
    Json(body): Json<EndPeriodRequest>,
) -> Result<Json<PeriodRecord>, ApiError> {
    let record = state
        .store
        .end_period(body.user_id, period_id, body.end_date, body.notes)
        .await?;

    if body.end_date < record.start_date {
        tracing::warn!(
            "⚠️ Period {} ends ({}) before it starts ({})",
            record.id,
            body.end_date,
            record.start_date
        );
    }
    tracing::info!("✅ Period {} ended for user {}", record.id, record.user_id);

    Ok(Json(record))
}

async fn list_periods(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<PeriodRecord>>, ApiError> {
    let periods = state.store.list_periods(query.user_id, None).await?;
    Ok(Json(periods))
}

async fn get_active_period(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Option<PeriodRecord>>, ApiError> {
    let periods = state
        .store
        .list_periods(query.user_id, Some(state.phase_history_limit))
        .await?;
    Ok(Json(active_period(&periods).cloned()))
}
