//! Purges login and invite tokens that can no longer be used.

use persistence::repositories::LoginTokenRepository;
use sqlx::PgPool;
use tracing::info;

use super::scheduler::{Job, JobFrequency};

pub struct LoginTokenCleanupJob {
    repo: LoginTokenRepository,
}

impl LoginTokenCleanupJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: LoginTokenRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for LoginTokenCleanupJob {
    fn name(&self) -> &'static str {
        "login_token_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let deleted = self
            .repo
            .delete_stale()
            .await
            .map_err(|e| format!("Failed to delete stale login tokens: {}", e))?;

        if deleted > 0 {
            info!(deleted, "Deleted stale login tokens");
        }
        Ok(())
    }
}
