pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod phase;
pub mod reminders;
pub mod routes;
pub mod stats;
pub mod store;
pub mod streak;

#[cfg(test)]
pub(crate) mod test_utils;

use axum::{routing::get, Router};
use routes::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::periods::routes(state.clone()))
        .merge(routes::phase::routes(state.clone()))
        .merge(routes::cycle_stats::routes(state.clone()))
        .merge(routes::date_nights::routes(state.clone()))
        .merge(routes::profile::routes(state.clone()))
        .merge(routes::events::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }))
}
