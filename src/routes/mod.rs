use crate::store::CycleStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub mod cycle_stats;
pub mod date_nights;
pub mod events;
pub mod periods;
pub mod phase;
pub mod profile;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CycleStore>,
    pub phase_history_limit: i64,
}

impl AppState {
    pub fn new(store: Arc<dyn CycleStore>, phase_history_limit: i64) -> Self {
        Self { store, phase_history_limit }
    }
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}

/// `now` is optional so clients (and tests) can ask "what was the phase on
/// this date"; it defaults to the server clock.
#[derive(Deserialize)]
pub struct UserAtQuery {
    pub user_id: Uuid,
    pub now: Option<DateTime<Utc>>,
}

impl UserAtQuery {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    AppState::new(Arc::new(crate::store::MemoryStore::new()), 10)
}
