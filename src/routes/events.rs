use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, UserAtQuery, UserQuery};
use crate::error::ApiError;
use crate::models::{EventRecord, NewEvent};
use crate::reminders::{next_event, UpcomingEvent};

#[derive(Deserialize)]
pub struct AddEventRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub event: NewEvent,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(add_event).get(list_events))
        .route("/events/next", get(get_next_event))
        .with_state(state)
}

async fn add_event(
    State(state): State<AppState>,
    Json(mut body): Json<AddEventRequest>,
) -> Result<(StatusCode, Json<EventRecord>), ApiError> {
    body.event.title = body.event.title.trim().to_string();
    if body.event.title.is_empty() {
        return Err(ApiError::BadRequest("title is required".into()));
    }
    if body.event.is_recurring && body.event.recurring_frequency.is_none() {
        return Err(ApiError::BadRequest(
            "recurring_frequency is required for recurring events".into(),
        ));
    }

    let record = state.store.create_event(body.user_id, body.event).await?;
    tracing::info!("📅 Event {} added for user {}", record.id, record.user_id);

    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let events = state.store.list_events(query.user_id).await?;
    Ok(Json(events))
}

async fn get_next_event(
    State(state): State<AppState>,
    Query(query): Query<UserAtQuery>,
) -> Result<Json<Option<UpcomingEvent>>, ApiError> {
    let events = state.store.list_events(query.user_id).await?;
    Ok(Json(next_event(&events, query.now())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecurringFrequency;
    use crate::routes::test_state;
    use crate::test_utils::{day, user};

    fn request(title: &str, d: i64, frequency: Option<RecurringFrequency>) -> Json<AddEventRequest> {
        Json(AddEventRequest {
            user_id: user(),
            event: NewEvent {
                title: title.into(),
                date: day(d),
                description: None,
                is_recurring: frequency.is_some(),
                recurring_frequency: frequency,
            },
        })
    }

    #[tokio::test]
    async fn next_event_comes_from_stored_events() {
        let state = test_state();
        for (title, d, frequency) in [
            ("Concert", 12, None),
            ("Dentist", -2, None),
            ("Book club", -20, Some(RecurringFrequency::Weekly)),
        ] {
            let (status, _) = add_event(State(state.clone()), request(title, d, frequency))
                .await
                .unwrap();
            assert_eq!(status, StatusCode::CREATED);
        }

        let query = Query(UserAtQuery { user_id: user(), now: Some(day(0)) });
        let Json(next) = get_next_event(State(state.clone()), query).await.unwrap();
        let next = next.unwrap();
        assert_eq!(next.event.title, "Book club");
        assert_eq!(next.occurs_at, day(1));
        assert_eq!(next.days_until, 1);

        let Json(events) = list_events(State(state), Query(UserQuery { user_id: user() }))
            .await
            .unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].title, "Book club");
    }

    #[tokio::test]
    async fn no_upcoming_event_is_null() {
        let state = test_state();
        let (status, _) = add_event(State(state.clone()), request("Dentist", -2, None))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let query = Query(UserAtQuery { user_id: user(), now: Some(day(0)) });
        let Json(next) = get_next_event(State(state), query).await.unwrap();
        assert!(next.is_none());
    }

    #[tokio::test]
    async fn invalid_events_are_rejected() {
        let state = test_state();

        let err = add_event(State(state.clone()), request("  ", 3, None)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let mut body = request("Anniversary", 3, None);
        body.event.is_recurring = true;
        let err = add_event(State(state), body).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
