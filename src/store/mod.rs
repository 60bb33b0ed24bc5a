//! Persistence for period, date-night, profile and event records.
//!
//! The core functions only need "an ordered list of records"; this trait is
//! that list plus the writes the app performs (append, set an end date,
//! replace the profile).

use crate::models::{
    DateNightRecord, EventRecord, NewDateNight, NewEvent, NewPeriod, PartnerProfile, PeriodRecord,
    SaveProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("user {0} already has an active period")]
    ActivePeriodExists(Uuid),

    #[error("period {0} not found")]
    PeriodNotFound(Uuid),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[async_trait]
pub trait CycleStore: Send + Sync {
    /// Appends a new, still-active period. Fails with `ActivePeriodExists`
    /// while the user has another open one.
    async fn create_period(&self, user_id: Uuid, new: NewPeriod) -> Result<PeriodRecord>;

    /// Sets the end date of one of the user's periods. `notes` replaces the
    /// stored notes only when present.
    async fn end_period(
        &self,
        user_id: Uuid,
        period_id: Uuid,
        end_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<PeriodRecord>;

    /// Newest-first by start date, at most `limit` records when given.
    async fn list_periods(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<PeriodRecord>>;

    async fn create_date_night(&self, user_id: Uuid, new: NewDateNight) -> Result<DateNightRecord>;

    /// Newest-first by date.
    async fn list_date_nights(&self, user_id: Uuid) -> Result<Vec<DateNightRecord>>;

    /// Creates or replaces the user's partner profile.
    async fn save_profile(&self, user_id: Uuid, profile: SaveProfile) -> Result<PartnerProfile>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<PartnerProfile>>;

    async fn create_event(&self, user_id: Uuid, new: NewEvent) -> Result<EventRecord>;

    /// Oldest-first by date.
    async fn list_events(&self, user_id: Uuid) -> Result<Vec<EventRecord>>;
}
