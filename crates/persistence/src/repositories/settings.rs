//! Restaurant settings repository.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use crate::entities::SettingsEntity;
use crate::metrics::QueryTimer;

/// Repository for the singleton settings row.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Load the settings row. `None` if it has not been seeded.
    pub async fn get(&self) -> Result<Option<SettingsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_settings");

        let result = sqlx::query_as::<_, SettingsEntity>(
            r#"
            SELECT opening_time, closing_time, closed_dates, updated_at
            FROM restaurant_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Replace the settings, creating the row if needed.
    pub async fn upsert(
        &self,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
        closed_dates: &[NaiveDate],
    ) -> Result<SettingsEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_settings");

        let result = sqlx::query_as::<_, SettingsEntity>(
            r#"
            INSERT INTO restaurant_settings (id, opening_time, closing_time, closed_dates, updated_at)
            VALUES (1, $1, $2, $3, NOW())
            ON CONFLICT (id) DO UPDATE
            SET opening_time = EXCLUDED.opening_time,
                closing_time = EXCLUDED.closing_time,
                closed_dates = EXCLUDED.closed_dates,
                updated_at = NOW()
            RETURNING opening_time, closing_time, closed_dates, updated_at
            "#,
        )
        .bind(opening_time)
        .bind(closing_time)
        .bind(closed_dates)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }
}
