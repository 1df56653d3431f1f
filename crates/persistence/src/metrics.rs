//! Query timing and connection pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Pool utilization at which `PoolStats::is_saturated` reports true.
pub const SATURATION_THRESHOLD: f64 = 0.9;

/// Times one repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_table_by_id");
/// let result = sqlx::query_as::<_, TableEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records `database_query_duration_seconds{query}`.
    pub fn record(self) {
        histogram!("database_query_duration_seconds", "query" => self.query)
            .record(self.start.elapsed().as_secs_f64());
    }
}

/// Point-in-time view of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max: u32,
}

impl PoolStats {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            size: pool.size(),
            idle: u32::try_from(pool.num_idle()).unwrap_or(u32::MAX),
            max: pool.options().get_max_connections(),
        }
    }

    pub fn in_use(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }

    /// Share of `max` currently checked out, in `0.0..=1.0`.
    pub fn utilization(&self) -> f64 {
        if self.max == 0 {
            return 0.0;
        }
        (f64::from(self.in_use()) / f64::from(self.max)).min(1.0)
    }

    pub fn is_saturated(&self) -> bool {
        self.utilization() >= SATURATION_THRESHOLD
    }
}

/// Publishes the `database_connections_*` gauges and returns what was
/// published.
pub fn record_pool_metrics(pool: &PgPool) -> PoolStats {
    let stats = PoolStats::of(pool);

    gauge!("database_connections_active").set(f64::from(stats.in_use()));
    gauge!("database_connections_idle").set(f64::from(stats.idle));
    gauge!("database_connections_total").set(f64::from(stats.size));
    gauge!("database_connections_max").set(f64::from(stats.max));
    gauge!("database_pool_utilization").set(stats.utilization());

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_stats_in_use_and_utilization() {
        let stats = PoolStats {
            size: 8,
            idle: 3,
            max: 10,
        };
        assert_eq!(stats.in_use(), 5);
        assert!((stats.utilization() - 0.5).abs() < f64::EPSILON);
        assert!(!stats.is_saturated());
    }

    #[test]
    fn test_pool_stats_saturation() {
        let stats = PoolStats {
            size: 10,
            idle: 1,
            max: 10,
        };
        assert!(stats.is_saturated());

        // More idle than open can briefly be reported while connections close
        let stats = PoolStats {
            size: 2,
            idle: 3,
            max: 10,
        };
        assert_eq!(stats.in_use(), 0);
        assert_eq!(stats.utilization(), 0.0);
    }

    #[test]
    fn test_pool_stats_without_capacity() {
        let stats = PoolStats {
            size: 0,
            idle: 0,
            max: 0,
        };
        assert_eq!(stats.utilization(), 0.0);
    }

    #[test]
    fn test_query_timer_records_without_recorder() {
        let timer = QueryTimer::new("list_tables");
        assert_eq!(timer.query, "list_tables");
        timer.record();
    }
}
