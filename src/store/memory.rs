use super::{CycleStore, Result, StoreError};
use crate::models::{
    DateNightRecord, EventRecord, NewDateNight, NewEvent, NewPeriod, PartnerProfile, PeriodRecord,
    SaveProfile,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    periods: RwLock<HashMap<Uuid, Vec<PeriodRecord>>>,
    date_nights: RwLock<HashMap<Uuid, Vec<DateNightRecord>>>,
    profiles: RwLock<HashMap<Uuid, PartnerProfile>>,
    events: RwLock<HashMap<Uuid, Vec<EventRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CycleStore for MemoryStore {
    async fn create_period(&self, user_id: Uuid, new: NewPeriod) -> Result<PeriodRecord> {
        // Check and insert under one guard.
        let mut periods = self.periods.write().await;
        let list = periods.entry(user_id).or_default();
        if list.iter().any(PeriodRecord::is_active) {
            return Err(StoreError::ActivePeriodExists(user_id));
        }

        let record = PeriodRecord {
            id: Uuid::new_v4(),
            user_id,
            start_date: new.start_date,
            end_date: None,
            flow: new.flow,
            symptoms: new.symptoms,
            notes: new.notes,
            created_at: Utc::now(),
        };
        list.push(record.clone());

        Ok(record)
    }

    async fn end_period(
        &self,
        user_id: Uuid,
        period_id: Uuid,
        end_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<PeriodRecord> {
        let mut periods = self.periods.write().await;
        let record = periods
            .get_mut(&user_id)
            .and_then(|list| list.iter_mut().find(|p| p.id == period_id))
            .ok_or(StoreError::PeriodNotFound(period_id))?;

        record.end_date = Some(end_date);
        if notes.is_some() {
            record.notes = notes;
        }

        Ok(record.clone())
    }

    async fn list_periods(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<PeriodRecord>> {
        let mut list = self
            .periods
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default();

        list.sort_by(|a, b| {
            b.start_date
                .cmp(&a.start_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        if let Some(limit) = limit {
            list.truncate(limit.max(0) as usize);
        }

        Ok(list)
    }

    async fn create_date_night(&self, user_id: Uuid, new: NewDateNight) -> Result<DateNightRecord> {
        let record = DateNightRecord {
            id: Uuid::new_v4(),
            user_id,
            date: new.date,
            notes: new.notes,
            location: new.location,
            activity: new.activity,
            created_at: Utc::now(),
        };

        self.date_nights
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn list_date_nights(&self, user_id: Uuid) -> Result<Vec<DateNightRecord>> {
        let mut list = self
            .date_nights
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default();

        list.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(list)
    }

    async fn save_profile(&self, user_id: Uuid, profile: SaveProfile) -> Result<PartnerProfile> {
        let saved = PartnerProfile {
            user_id,
            first_name: profile.first_name,
            nickname: profile.nickname,
            anniversary_date: profile.anniversary_date,
            favorite_color: profile.favorite_color,
            hobbies: profile.hobbies,
            food_preferences: profile.food_preferences,
            updated_at: Utc::now(),
        };

        self.profiles.write().await.insert(user_id, saved.clone());
        Ok(saved)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<PartnerProfile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn create_event(&self, user_id: Uuid, new: NewEvent) -> Result<EventRecord> {
        let record = EventRecord {
            id: Uuid::new_v4(),
            user_id,
            title: new.title,
            date: new.date,
            description: new.description,
            is_recurring: new.is_recurring,
            recurring_frequency: new.recurring_frequency,
            created_at: Utc::now(),
        };

        self.events
            .write()
            .await
            .entry(user_id)
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn list_events(&self, user_id: Uuid) -> Result<Vec<EventRecord>> {
        let mut list = self
            .events
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default();

        list.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{day, user};
    use std::sync::Arc;

    fn new_period(start: i64) -> NewPeriod {
        NewPeriod { start_date: day(start), flow: None, symptoms: Vec::new(), notes: None }
    }

    #[tokio::test]
    async fn periods_list_newest_first_and_respect_limit() {
        let store = MemoryStore::new();
        for start in [-60, 0, -30] {
            let record = store.create_period(user(), new_period(start)).await.unwrap();
            store.end_period(user(), record.id, day(start + 5), None).await.unwrap();
        }

        let all = store.list_periods(user(), None).await.unwrap();
        let starts: Vec<_> = all.iter().map(|p| p.start_date).collect();
        assert_eq!(starts, vec![day(0), day(-30), day(-60)]);

        let two = store.list_periods(user(), Some(2)).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[1].start_date, day(-30));
    }

    #[tokio::test]
    async fn end_period_sets_end_and_keeps_notes_when_absent() {
        let store = MemoryStore::new();
        let mut new = new_period(0);
        new.notes = Some("cramps".into());
        let created = store.create_period(user(), new).await.unwrap();
        assert!(created.is_active());

        let ended = store.end_period(user(), created.id, day(5), None).await.unwrap();
        assert_eq!(ended.end_date, Some(day(5)));
        assert_eq!(ended.notes.as_deref(), Some("cramps"));

        let ended = store
            .end_period(user(), created.id, day(4), Some("lighter".into()))
            .await
            .unwrap();
        assert_eq!(ended.notes.as_deref(), Some("lighter"));
    }

    #[tokio::test]
    async fn end_period_is_scoped_to_user() {
        let store = MemoryStore::new();
        let created = store.create_period(user(), new_period(0)).await.unwrap();

        let err = store
            .end_period(Uuid::new_v4(), created.id, day(5), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PeriodNotFound(id) if id == created.id));
    }

    #[tokio::test]
    async fn date_nights_list_newest_first() {
        let store = MemoryStore::new();
        for d in [0, 14, 7] {
            let new = NewDateNight { date: day(d), notes: None, location: None, activity: None };
            store.create_date_night(user(), new).await.unwrap();
        }

        let dates: Vec<_> = store
            .list_date_nights(user())
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.date)
            .collect();
        assert_eq!(dates, vec![day(14), day(7), day(0)]);
        assert!(store.list_date_nights(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_one_open_period_per_user() {
        let store = MemoryStore::new();
        let open = store.create_period(user(), new_period(0)).await.unwrap();

        let err = store.create_period(user(), new_period(3)).await.unwrap_err();
        assert!(matches!(err, StoreError::ActivePeriodExists(id) if id == user()));

        // Other users are unaffected, and ending the open one frees the slot.
        store.create_period(Uuid::new_v4(), new_period(3)).await.unwrap();
        store.end_period(user(), open.id, day(5), None).await.unwrap();
        store.create_period(user(), new_period(28)).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_starts_leave_one_open_period() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create_period(user(), new_period(i)).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);

        let open = store
            .list_periods(user(), None)
            .await
            .unwrap()
            .into_iter()
            .filter(PeriodRecord::is_active)
            .count();
        assert_eq!(open, 1);
    }

    #[tokio::test]
    async fn profile_is_replaced_on_save() {
        let store = MemoryStore::new();
        assert!(store.get_profile(user()).await.unwrap().is_none());

        let profile = SaveProfile {
            first_name: "Maya".into(),
            nickname: None,
            anniversary_date: None,
            favorite_color: Some("green".into()),
            hobbies: vec!["climbing".into()],
            food_preferences: Vec::new(),
        };
        store.save_profile(user(), profile.clone()).await.unwrap();

        let replacement = SaveProfile { favorite_color: None, ..profile };
        store.save_profile(user(), replacement).await.unwrap();

        let stored = store.get_profile(user()).await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Maya");
        assert_eq!(stored.favorite_color, None);
        assert_eq!(stored.hobbies, vec!["climbing".to_string()]);
    }

    #[tokio::test]
    async fn events_list_oldest_first() {
        let store = MemoryStore::new();
        for d in [10, -3, 4] {
            let new = NewEvent {
                title: format!("event {d}"),
                date: day(d),
                description: None,
                is_recurring: false,
                recurring_frequency: None,
            };
            store.create_event(user(), new).await.unwrap();
        }

        let dates: Vec<_> = store
            .list_events(user())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(dates, vec![day(-3), day(4), day(10)]);
    }
}
