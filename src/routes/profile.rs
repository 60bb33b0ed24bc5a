use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppState, UserAtQuery};
use crate::error::ApiError;
use crate::models::{PartnerProfile, SaveProfile};
use crate::reminders::days_until_anniversary;

#[derive(Deserialize)]
pub struct SaveProfileRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub profile: SaveProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: PartnerProfile,
    pub days_until_anniversary: Option<i64>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(save_profile))
        .with_state(state)
}

async fn save_profile(
    State(state): State<AppState>,
    Json(mut body): Json<SaveProfileRequest>,
) -> Result<Json<PartnerProfile>, ApiError> {
    body.profile.first_name = body.profile.first_name.trim().to_string();
    if body.profile.first_name.is_empty() {
        return Err(ApiError::BadRequest("first_name is required".into()));
    }

    let profile = state.store.save_profile(body.user_id, body.profile).await?;
    tracing::info!("💾 Profile saved for user {}", profile.user_id);

    Ok(Json(profile))
}

async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<UserAtQuery>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state
        .store
        .get_profile(query.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No profile found".into()))?;

    let days_until_anniversary = profile
        .anniversary_date
        .and_then(|date| days_until_anniversary(date, query.now()));

    Ok(Json(ProfileResponse { profile, days_until_anniversary }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_state;
    use crate::test_utils::{day, user};
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn request(first_name: &str, anniversary: Option<NaiveDate>) -> Json<SaveProfileRequest> {
        Json(SaveProfileRequest {
            user_id: user(),
            profile: SaveProfile {
                first_name: first_name.into(),
                nickname: None,
                anniversary_date: anniversary,
                favorite_color: None,
                hobbies: Vec::new(),
                food_preferences: Vec::new(),
            },
        })
    }

    fn at(now: i64) -> Query<UserAtQuery> {
        Query(UserAtQuery { user_id: user(), now: Some(day(now)) })
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let err = get_profile(State(test_state()), at(0)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_first_name_is_rejected() {
        let err = save_profile(State(test_state()), request("   ", None)).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn profile_reports_anniversary_countdown() {
        let state = test_state();
        let anniversary = NaiveDate::from_ymd_opt(2018, 3, 11);
        let Json(saved) = save_profile(State(state.clone()), request(" Maya ", anniversary))
            .await
            .unwrap();
        assert_eq!(saved.first_name, "Maya");

        // day(0) is 2024-03-01.
        let Json(response) = get_profile(State(state.clone()), at(0)).await.unwrap();
        assert_eq!(response.days_until_anniversary, Some(10));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["first_name"], "Maya");
        assert_eq!(json["anniversary_date"], "2018-03-11");
    }

    #[tokio::test]
    async fn no_anniversary_means_no_countdown() {
        let state = test_state();
        let Json(saved) = save_profile(State(state.clone()), request("Maya", None)).await.unwrap();
        assert_eq!(saved.anniversary_date, None);

        let Json(response) = get_profile(State(state), at(0)).await.unwrap();
        assert_eq!(response.days_until_anniversary, None);
    }
}
