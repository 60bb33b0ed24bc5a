use serde::{ Serialize, Deserialize };
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Light,
    Medium,
    Heavy,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "heavy" => Ok(Self::Heavy),
            other => Err(format!("unknown flow '{}'", other)),
        }
    }
}

/// One logged period. `end_date == None` means the period is still active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub flow: Option<Flow>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PeriodRecord {
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateNightRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub activity: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPeriod {
    pub start_date: DateTime<Utc>,
    pub flow: Option<Flow>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDateNight {
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub activity: Option<String>,
}

/// Named stage of the cycle, without its day counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
    Late,
    Unknown,
}

/// Output of the phase engine. Counters are signed: malformed history
/// (an end before a start, future-dated records) can drive them negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PhaseResult {
    Unknown,
    Menstrual { days_in: i64 },
    Follicular { days_in: i64, days_until: i64 },
    Ovulatory { days_in: i64, days_until: i64 },
    Luteal { days_in: i64, days_until: i64 },
    Late { days_late: i64 },
}

impl PhaseResult {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Unknown => Phase::Unknown,
            Self::Menstrual { .. } => Phase::Menstrual,
            Self::Follicular { .. } => Phase::Follicular,
            Self::Ovulatory { .. } => Phase::Ovulatory,
            Self::Luteal { .. } => Phase::Luteal,
            Self::Late { .. } => Phase::Late,
        }
    }

    pub fn days_in(&self) -> Option<i64> {
        match *self {
            Self::Menstrual { days_in }
            | Self::Follicular { days_in, .. }
            | Self::Ovulatory { days_in, .. }
            | Self::Luteal { days_in, .. } => Some(days_in),
            Self::Unknown | Self::Late { .. } => None,
        }
    }

    pub fn days_until(&self) -> Option<i64> {
        match *self {
            Self::Follicular { days_until, .. }
            | Self::Ovulatory { days_until, .. }
            | Self::Luteal { days_until, .. } => Some(days_until),
            _ => None,
        }
    }

    pub fn days_late(&self) -> Option<i64> {
        match *self {
            Self::Late { days_late } => Some(days_late),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStat {
    pub cycle_number: i32,
    pub start_date: DateTime<Utc>,
    pub period_length: Option<i64>,
    pub cycle_length: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStats {
    pub average_period_length: Option<f64>,
    pub average_cycle_length: Option<f64>,
    pub cycle_stats: Vec<CycleStat>,
}

/// The partner profile; one per user, replaced wholesale on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub nickname: Option<String>,
    pub anniversary_date: Option<NaiveDate>,
    pub favorite_color: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub food_preferences: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveProfile {
    pub first_name: String,
    pub nickname: Option<String>,
    pub anniversary_date: Option<NaiveDate>,
    pub favorite_color: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub food_preferences: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringFrequency {
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl FromStr for RecurringFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown recurring frequency '{}'", other)),
        }
    }
}

/// A dated event on the partner's calendar (birthday, appointment, ...).
/// `recurring_frequency` is only meaningful when `is_recurring` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
}
