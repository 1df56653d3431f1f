//! Evicts idle clients from the public rate limiter.

use std::sync::Arc;
use tracing::debug;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::RateLimiterState;

pub struct RateLimiterCleanupJob {
    limiter: Arc<RateLimiterState>,
}

impl RateLimiterCleanupJob {
    pub fn new(limiter: Arc<RateLimiterState>) -> Self {
        Self { limiter }
    }
}

#[async_trait::async_trait]
impl Job for RateLimiterCleanupJob {
    fn name(&self) -> &'static str {
        "rate_limiter_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let remaining = self.limiter.evict_idle();
        debug!(tracked_clients = remaining, "Rate limiter cleaned up");
        Ok(())
    }
}
