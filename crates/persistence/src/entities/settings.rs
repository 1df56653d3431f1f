//! Restaurant settings entity (singleton row).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the restaurant_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct SettingsEntity {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub closed_dates: Vec<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

impl From<SettingsEntity> for domain::models::RestaurantSettings {
    fn from(entity: SettingsEntity) -> Self {
        let mut closed_dates = entity.closed_dates;
        closed_dates.sort_unstable();
        closed_dates.dedup();

        Self {
            opening_time: entity.opening_time,
            closing_time: entity.closing_time,
            closed_dates,
            updated_at: entity.updated_at,
        }
    }
}
