//! Periodic background jobs.

mod login_tokens;
mod pool_metrics;
mod rate_limiter;
mod scheduler;

pub use login_tokens::LoginTokenCleanupJob;
pub use pool_metrics::PoolMetricsJob;
pub use rate_limiter::RateLimiterCleanupJob;
pub use scheduler::{Job, JobFrequency, JobScheduler};
