use super::{CycleStore, Result, StoreError};
use crate::models::{
    DateNightRecord, EventRecord, Flow, NewDateNight, NewEvent, NewPeriod, PartnerProfile,
    PeriodRecord, RecurringFrequency, SaveProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const PERIOD_COLUMNS: &str =
    "id, user_id, start_date, end_date, flow, symptoms, notes, created_at";
const DATE_NIGHT_COLUMNS: &str =
    "id, user_id, date, notes, location, activity, created_at";
const PROFILE_COLUMNS: &str =
    "user_id, first_name, nickname, anniversary_date, favorite_color, hobbies, food_preferences, updated_at";
const EVENT_COLUMNS: &str =
    "id, user_id, title, date, description, is_recurring, recurring_frequency, created_at";

/// Partial unique index allowing a single open period per user.
const ONE_OPEN_PERIOD_INDEX: &str = "periods_one_open_per_user";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PeriodRow {
    id: Uuid,
    user_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    flow: Option<String>,
    symptoms: Vec<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PeriodRow> for PeriodRecord {
    type Error = StoreError;

    fn try_from(row: PeriodRow) -> Result<Self> {
        let flow = row
            .flow
            .as_deref()
            .map(str::parse::<Flow>)
            .transpose()
            .map_err(StoreError::Corrupt)?;

        Ok(PeriodRecord {
            id: row.id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            flow,
            symptoms: row.symptoms,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

#[derive(FromRow)]
struct DateNightRow {
    id: Uuid,
    user_id: Uuid,
    date: DateTime<Utc>,
    notes: Option<String>,
    location: Option<String>,
    activity: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<DateNightRow> for DateNightRecord {
    fn from(row: DateNightRow) -> Self {
        DateNightRecord {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            notes: row.notes,
            location: row.location,
            activity: row.activity,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ProfileRow {
    user_id: Uuid,
    first_name: String,
    nickname: Option<String>,
    anniversary_date: Option<NaiveDate>,
    favorite_color: Option<String>,
    hobbies: Vec<String>,
    food_preferences: Vec<String>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for PartnerProfile {
    fn from(row: ProfileRow) -> Self {
        PartnerProfile {
            user_id: row.user_id,
            first_name: row.first_name,
            nickname: row.nickname,
            anniversary_date: row.anniversary_date,
            favorite_color: row.favorite_color,
            hobbies: row.hobbies,
            food_preferences: row.food_preferences,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    date: DateTime<Utc>,
    description: Option<String>,
    is_recurring: bool,
    recurring_frequency: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for EventRecord {
    type Error = StoreError;

    fn try_from(row: EventRow) -> Result<Self> {
        let recurring_frequency = row
            .recurring_frequency
            .as_deref()
            .map(str::parse::<RecurringFrequency>)
            .transpose()
            .map_err(StoreError::Corrupt)?;

        Ok(EventRecord {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            date: row.date,
            description: row.description,
            is_recurring: row.is_recurring,
            recurring_frequency,
            created_at: row.created_at,
        })
    }
}

/// Maps a violation of the one-open-period index to `ActivePeriodExists`.
fn period_insert_error(e: sqlx::Error, user_id: Uuid) -> StoreError {
    let constraint = e
        .as_database_error()
        .and_then(|db_err| db_err.constraint())
        .map(str::to_owned);

    match constraint.as_deref() {
        Some(ONE_OPEN_PERIOD_INDEX) => {
            tracing::info!("🔒 Constraint violated: {}", ONE_OPEN_PERIOD_INDEX);
            StoreError::ActivePeriodExists(user_id)
        }
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl CycleStore for PgStore {
    async fn create_period(&self, user_id: Uuid, new: NewPeriod) -> Result<PeriodRecord> {
        let sql = format!(
            "INSERT INTO periods (id, user_id, start_date, end_date, flow, symptoms, notes)
             VALUES ($1, $2, $3, NULL, $4, $5, $6)
             RETURNING {PERIOD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PeriodRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(new.start_date)
            .bind(new.flow.map(|f| f.as_str()))
            .bind(&new.symptoms)
            .bind(&new.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| period_insert_error(e, user_id))?;

        row.try_into()
    }

    async fn end_period(
        &self,
        user_id: Uuid,
        period_id: Uuid,
        end_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<PeriodRecord> {
        let sql = format!(
            "UPDATE periods SET end_date = $3, notes = COALESCE($4, notes)
             WHERE user_id = $1 AND id = $2
             RETURNING {PERIOD_COLUMNS}"
        );

        let row = sqlx::query_as::<_, PeriodRow>(&sql)
            .bind(user_id)
            .bind(period_id)
            .bind(end_date)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::PeriodNotFound(period_id))?;

        row.try_into()
    }

    async fn list_periods(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<PeriodRecord>> {
        // LIMIT NULL means no limit in Postgres.
        let sql = format!(
            "SELECT {PERIOD_COLUMNS} FROM periods
             WHERE user_id = $1
             ORDER BY start_date DESC, created_at DESC
             LIMIT $2"
        );

        sqlx::query_as::<_, PeriodRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(PeriodRecord::try_from)
            .collect()
    }

    async fn create_date_night(&self, user_id: Uuid, new: NewDateNight) -> Result<DateNightRecord> {
        let sql = format!(
            "INSERT INTO date_nights (id, user_id, date, notes, location, activity)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {DATE_NIGHT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, DateNightRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(new.date)
            .bind(&new.notes)
            .bind(&new.location)
            .bind(&new.activity)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn list_date_nights(&self, user_id: Uuid) -> Result<Vec<DateNightRecord>> {
        let sql = format!(
            "SELECT {DATE_NIGHT_COLUMNS} FROM date_nights
             WHERE user_id = $1
             ORDER BY date DESC"
        );

        let rows = sqlx::query_as::<_, DateNightRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(DateNightRecord::from).collect())
    }

    async fn save_profile(&self, user_id: Uuid, profile: SaveProfile) -> Result<PartnerProfile> {
        let sql = format!(
            "INSERT INTO partner_profiles
                 (user_id, first_name, nickname, anniversary_date, favorite_color, hobbies, food_preferences, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, now())
             ON CONFLICT (user_id) DO UPDATE SET
                 first_name = EXCLUDED.first_name,
                 nickname = EXCLUDED.nickname,
                 anniversary_date = EXCLUDED.anniversary_date,
                 favorite_color = EXCLUDED.favorite_color,
                 hobbies = EXCLUDED.hobbies,
                 food_preferences = EXCLUDED.food_preferences,
                 updated_at = EXCLUDED.updated_at
             RETURNING {PROFILE_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(&profile.first_name)
            .bind(&profile.nickname)
            .bind(profile.anniversary_date)
            .bind(&profile.favorite_color)
            .bind(&profile.hobbies)
            .bind(&profile.food_preferences)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<PartnerProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM partner_profiles WHERE user_id = $1");

        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(PartnerProfile::from))
    }

    async fn create_event(&self, user_id: Uuid, new: NewEvent) -> Result<EventRecord> {
        let sql = format!(
            "INSERT INTO events (id, user_id, title, date, description, is_recurring, recurring_frequency)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {EVENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(&new.title)
            .bind(new.date)
            .bind(&new.description)
            .bind(new.is_recurring)
            .bind(new.recurring_frequency.map(|f| f.as_str()))
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn list_events(&self, user_id: Uuid) -> Result<Vec<EventRecord>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE user_id = $1
             ORDER BY date ASC"
        );

        sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(EventRecord::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::user;

    #[test]
    fn non_constraint_errors_stay_database_errors() {
        let err = period_insert_error(sqlx::Error::PoolTimedOut, user());
        assert!(matches!(err, StoreError::Database(sqlx::Error::PoolTimedOut)));
    }

    #[test]
    fn stored_frequency_must_be_known() {
        let row = EventRow {
            id: Uuid::nil(),
            user_id: user(),
            title: "Anniversary".into(),
            date: Utc::now(),
            description: None,
            is_recurring: true,
            recurring_frequency: Some("daily".into()),
            created_at: Utc::now(),
        };
        assert!(matches!(EventRecord::try_from(row), Err(StoreError::Corrupt(_))));
    }
}
