//! Restaurant table repository for database operations.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{TableEntity, TableStatusCount, TableStatusDb};
use crate::metrics::QueryTimer;

/// Outcome of a table delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTableOutcome {
    Deleted,
    NotFound,
    /// Still referenced by this many pending, accepted or arrived reservations.
    InUse(i64),
}

/// Repository for restaurant table database operations.
#[derive(Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    /// Creates a new TableRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new table.
    pub async fn create(
        &self,
        number: i32,
        capacity: i32,
        status: TableStatusDb,
    ) -> Result<TableEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_table");

        let result = sqlx::query_as::<_, TableEntity>(
            r#"
            INSERT INTO restaurant_tables (number, capacity, status)
            VALUES ($1, $2, $3)
            RETURNING id, number, capacity, status, created_at, updated_at
            "#,
        )
        .bind(number)
        .bind(capacity)
        .bind(status)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find table by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TableEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_table_by_id");

        let result = sqlx::query_as::<_, TableEntity>(
            r#"
            SELECT id, number, capacity, status, created_at, updated_at
            FROM restaurant_tables
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// List tables ordered by number.
    pub async fn list(&self, status: Option<TableStatusDb>) -> Result<Vec<TableEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_tables");

        let result = sqlx::query_as::<_, TableEntity>(
            r#"
            SELECT id, number, capacity, status, created_at, updated_at
            FROM restaurant_tables
            WHERE ($1::table_status IS NULL OR status = $1)
            ORDER BY number ASC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Partially update a table. `None` fields are left unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        number: Option<i32>,
        capacity: Option<i32>,
        status: Option<TableStatusDb>,
    ) -> Result<Option<TableEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_table");

        let result = sqlx::query_as::<_, TableEntity>(
            r#"
            UPDATE restaurant_tables
            SET number = COALESCE($2, number),
                capacity = COALESCE($3, capacity),
                status = COALESCE($4, status)
            WHERE id = $1
            RETURNING id, number, capacity, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(number)
        .bind(capacity)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Delete a table unless an active reservation still references it.
    pub async fn delete(&self, id: Uuid) -> Result<DeleteTableOutcome, sqlx::Error> {
        let timer = QueryTimer::new("delete_table");

        let mut tx = self.pool.begin().await?;

        // Lock the table so no reservation can be assigned to it meanwhile.
        let locked = Self::lock_many(&mut tx, &[id]).await?;
        if locked.is_empty() {
            timer.record();
            return Ok(DeleteTableOutcome::NotFound);
        }

        let in_use: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM reservations
            WHERE table_id = $1 AND status IN ('pending', 'accepted', 'arrived')
            "#,
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if in_use > 0 {
            timer.record();
            return Ok(DeleteTableOutcome::InUse(in_use));
        }

        sqlx::query("DELETE FROM restaurant_tables WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(DeleteTableOutcome::Deleted)
    }

    /// Lock the given tables for the rest of the transaction.
    ///
    /// Rows are locked in id order so concurrent callers cannot deadlock.
    pub async fn lock_many(
        tx: &mut Transaction<'_, Postgres>,
        ids: &[Uuid],
    ) -> Result<Vec<TableEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_tables_for_update");

        let result = sqlx::query_as::<_, TableEntity>(
            r#"
            SELECT id, number, capacity, status, created_at, updated_at
            FROM restaurant_tables
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(&mut **tx)
        .await;

        timer.record();
        result
    }

    /// Set the status of one table inside a transaction.
    pub async fn set_status(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: TableStatusDb,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_table_status");

        let result = sqlx::query("UPDATE restaurant_tables SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut **tx)
            .await;

        timer.record();
        result.map(|_| ())
    }

    /// Number of tables per status.
    pub async fn count_by_status(&self) -> Result<Vec<TableStatusCount>, sqlx::Error> {
        let timer = QueryTimer::new("count_tables_by_status");

        let result = sqlx::query_as::<_, TableStatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM restaurant_tables
            GROUP BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }
}
