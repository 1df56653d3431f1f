//! Reservation repository for database operations.

use chrono::NaiveDate;
use domain::models::NewReservation;
use domain::services::TransitionPlan;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{ReservationEntity, ReservationStatsRow, ReservationStatusDb};
use crate::metrics::QueryTimer;

/// Filters for listing reservations.
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatusDb>,
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
}

/// Escapes `%`, `_` and `\` for use inside an ILIKE pattern.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Repository for reservation database operations.
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a booking with status `pending` and no table.
    pub async fn create(&self, input: &NewReservation) -> Result<ReservationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_reservation");

        let result = sqlx::query_as::<_, ReservationEntity>(
            r#"
            INSERT INTO reservations (first_name, last_name, email, phone, date, time, guests, remark, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending')
            RETURNING id, first_name, last_name, email, phone, date, time, guests, remark,
                      status, table_id, created_at, updated_at
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.date)
        .bind(input.time)
        .bind(input.guests)
        .bind(&input.remark)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find reservation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reservation_by_id");

        let result = sqlx::query_as::<_, ReservationEntity>(
            r#"
            SELECT id, first_name, last_name, email, phone, date, time, guests, remark,
                   status, table_id, created_at, updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// List reservations ordered by date and time.
    pub async fn list(&self, filter: &ReservationFilter) -> Result<Vec<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reservations");

        let search = filter.search.as_deref().filter(|s| !s.trim().is_empty()).map(like_pattern);

        let result = sqlx::query_as::<_, ReservationEntity>(
            r#"
            SELECT id, first_name, last_name, email, phone, date, time, guests, remark,
                   status, table_id, created_at, updated_at
            FROM reservations
            WHERE ($1::reservation_status IS NULL OR status = $1)
              AND ($2::date IS NULL OR date = $2)
              AND ($3::text IS NULL
                   OR first_name ILIKE $3
                   OR last_name ILIKE $3
                   OR email ILIKE $3
                   OR (first_name || ' ' || last_name) ILIKE $3)
            ORDER BY date DESC, time ASC, created_at ASC
            "#,
        )
        .bind(filter.status)
        .bind(filter.date)
        .bind(search)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Accepted reservations on a given day, ordered by time.
    pub async fn find_accepted_on(&self, date: NaiveDate) -> Result<Vec<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_accepted_reservations_on");

        let result = sqlx::query_as::<_, ReservationEntity>(
            r#"
            SELECT id, first_name, last_name, email, phone, date, time, guests, remark,
                   status, table_id, created_at, updated_at
            FROM reservations
            WHERE date = $1 AND status = 'accepted'
            ORDER BY time ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Count reservations in the given status.
    pub async fn count_by_status(&self, status: ReservationStatusDb) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_reservations_by_status");

        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE status = $1",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// `(date, status)` rows with a date in `[from, to]`.
    pub async fn stats_rows(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<ReservationStatsRow>, sqlx::Error> {
        let timer = QueryTimer::new("reservation_stats_rows");

        let result = sqlx::query_as::<_, ReservationStatsRow>(
            r#"
            SELECT date, status
            FROM reservations
            WHERE date >= $1 AND date <= $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Lock a reservation row for the rest of the transaction.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_reservation_for_update");

        let result = sqlx::query_as::<_, ReservationEntity>(
            r#"
            SELECT id, first_name, last_name, email, phone, date, time, guests, remark,
                   status, table_id, created_at, updated_at
            FROM reservations
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await;

        timer.record();
        result
    }

    /// Write the reservation side of a lifecycle plan.
    pub async fn apply_plan(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        plan: &TransitionPlan,
    ) -> Result<ReservationEntity, sqlx::Error> {
        let timer = QueryTimer::new("apply_reservation_plan");

        let result = sqlx::query_as::<_, ReservationEntity>(
            r#"
            UPDATE reservations
            SET status = $2, table_id = $3, date = $4, time = $5, guests = $6
            WHERE id = $1
            RETURNING id, first_name, last_name, email, phone, date, time, guests, remark,
                      status, table_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(ReservationStatusDb::from(plan.status))
        .bind(plan.table_id)
        .bind(plan.date)
        .bind(plan.time)
        .bind(plan.guests)
        .fetch_one(&mut **tx)
        .await;

        timer.record();
        result
    }

    /// Delete a reservation, freeing its table if it still held one.
    ///
    /// Returns the deleted row, or `None` if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<Option<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("delete_reservation");

        let mut tx = self.pool.begin().await?;

        let Some(existing) = Self::lock_for_update(&mut tx, id).await? else {
            timer.record();
            return Ok(None);
        };

        if let Some(table_id) = existing.table_id {
            if existing.status != ReservationStatusDb::Cancelled {
                sqlx::query("UPDATE restaurant_tables SET status = 'available' WHERE id = $1")
                    .bind(table_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(existing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jane"), "%jane%");
        assert_eq!(like_pattern(" 50%_off "), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_filter_default_is_unfiltered() {
        let filter = ReservationFilter::default();
        assert!(filter.status.is_none());
        assert!(filter.date.is_none());
        assert!(filter.search.is_none());
    }
}
