//! Restaurant settings domain model.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes between two bookable time slots.
pub const SLOT_INTERVAL_MINUTES: u32 = 30;

/// Errors raised while normalizing a settings update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Opening time ({opening}) must be before closing time ({closing})")]
    InvalidHours { opening: String, closing: String },
}

/// Singleton restaurant settings (opening hours and closed dates).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantSettings {
    #[serde(with = "shared::time_format")]
    pub opening_time: NaiveTime,
    #[serde(with = "shared::time_format")]
    pub closing_time: NaiveTime,
    pub closed_dates: Vec<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        Self {
            opening_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            closed_dates: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

impl RestaurantSettings {
    /// Bookable slots from opening through closing time, inclusive.
    pub fn time_slots(&self) -> Vec<NaiveTime> {
        let start = self.opening_time.num_seconds_from_midnight() / 60;
        let end = self.closing_time.num_seconds_from_midnight() / 60;

        (start..=end)
            .step_by(SLOT_INTERVAL_MINUTES as usize)
            .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
            .collect()
    }

    /// Returns true if the restaurant is closed on the given date.
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.closed_dates.contains(&date)
    }

    /// Returns true if the time falls within opening hours.
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        time >= self.opening_time && time <= self.closing_time
    }
}

/// Public settings payload including the derived time slots.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    #[serde(with = "shared::time_format")]
    pub opening_time: NaiveTime,
    #[serde(with = "shared::time_format")]
    pub closing_time: NaiveTime,
    pub closed_dates: Vec<NaiveDate>,
    pub time_slots: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<RestaurantSettings> for SettingsResponse {
    fn from(s: RestaurantSettings) -> Self {
        let time_slots = s.time_slots().iter().map(shared::time_format::format).collect();
        Self {
            opening_time: s.opening_time,
            closing_time: s.closing_time,
            closed_dates: s.closed_dates,
            time_slots,
            updated_at: s.updated_at,
        }
    }
}

/// Request payload for replacing the settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(with = "shared::time_format")]
    pub opening_time: NaiveTime,
    #[serde(with = "shared::time_format")]
    pub closing_time: NaiveTime,
    #[serde(default)]
    pub closed_dates: Vec<NaiveDate>,
}

impl UpdateSettingsRequest {
    /// Sorts and de-duplicates closed dates and checks the opening hours.
    pub fn normalized(mut self) -> Result<Self, SettingsError> {
        if self.opening_time >= self.closing_time {
            return Err(SettingsError::InvalidHours {
                opening: shared::time_format::format(&self.opening_time),
                closing: shared::time_format::format(&self.closing_time),
            });
        }

        self.closed_dates.sort_unstable();
        self.closed_dates.dedup();
        Ok(self)
    }
}
