//! Login token repository (magic link tokens).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{LoginTokenEntity, LoginTokenPurposeDb};
use crate::metrics::QueryTimer;

/// Repository for login token database operations.
#[derive(Clone)]
pub struct LoginTokenRepository {
    pool: PgPool,
}

impl LoginTokenRepository {
    /// Creates a new LoginTokenRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new token hash.
    pub async fn create(
        &self,
        employee_id: Uuid,
        token_hash: &str,
        purpose: LoginTokenPurposeDb,
        expires_at: DateTime<Utc>,
    ) -> Result<LoginTokenEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_login_token");

        let result = sqlx::query_as::<_, LoginTokenEntity>(
            r#"
            INSERT INTO login_tokens (employee_id, token_hash, purpose, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, employee_id, token_hash, purpose, expires_at, consumed_at, created_at
            "#,
        )
        .bind(employee_id)
        .bind(token_hash)
        .bind(purpose)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Atomically mark an unexpired, unused token as consumed.
    ///
    /// Returns `None` if the token is unknown, expired or already used.
    pub async fn consume(&self, token_hash: &str) -> Result<Option<LoginTokenEntity>, sqlx::Error> {
        let timer = QueryTimer::new("consume_login_token");

        let result = sqlx::query_as::<_, LoginTokenEntity>(
            r#"
            UPDATE login_tokens
            SET consumed_at = NOW()
            WHERE token_hash = $1
              AND consumed_at IS NULL
              AND expires_at > NOW()
            RETURNING id, employee_id, token_hash, purpose, expires_at, consumed_at, created_at
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Invalidate outstanding tokens of an employee, e.g. before re-sending an invite.
    pub async fn revoke_for_employee(
        &self,
        employee_id: Uuid,
        purpose: LoginTokenPurposeDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("revoke_login_tokens");

        let result = sqlx::query(
            r#"
            UPDATE login_tokens
            SET consumed_at = NOW()
            WHERE employee_id = $1 AND purpose = $2 AND consumed_at IS NULL
            "#,
        )
        .bind(employee_id)
        .bind(purpose)
        .execute(&self.pool)
        .await;

        timer.record();
        result.map(|r| r.rows_affected())
    }

    /// Delete tokens that expired or were consumed more than a day ago.
    pub async fn delete_stale(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_stale_login_tokens");

        let result = sqlx::query(
            r#"
            DELETE FROM login_tokens
            WHERE expires_at < NOW() - INTERVAL '1 day'
               OR consumed_at < NOW() - INTERVAL '1 day'
            "#,
        )
        .execute(&self.pool)
        .await;

        timer.record();
        result.map(|r| r.rows_affected())
    }
}
