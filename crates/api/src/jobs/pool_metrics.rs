//! Connection pool gauges.

use persistence::metrics::record_pool_metrics;
use sqlx::PgPool;
use tracing::warn;

use super::scheduler::{Job, JobFrequency};

/// Publishes the pool gauges and warns while the pool is nearly exhausted.
pub struct PoolMetricsJob {
    pool: PgPool,
}

impl PoolMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(15)
    }

    async fn execute(&self) -> Result<(), String> {
        let stats = record_pool_metrics(&self.pool);
        if stats.is_saturated() {
            warn!(
                in_use = stats.in_use(),
                max = stats.max,
                "Database pool nearly exhausted"
            );
        }
        Ok(())
    }
}
