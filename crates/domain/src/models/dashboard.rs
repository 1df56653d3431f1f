//! Dashboard overview domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::reservation::Reservation;
use super::table::TableStatus;

/// Table counts by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TableMetrics {
    pub total: i64,
    pub available: i64,
    pub reserved: i64,
    pub occupied: i64,
}

impl TableMetrics {
    /// Builds the breakdown from `(status, count)` rows.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (TableStatus, i64)>,
    {
        let mut metrics = Self::default();
        for (status, count) in counts {
            match status {
                TableStatus::Available => metrics.available += count,
                TableStatus::Reserved => metrics.reserved += count,
                TableStatus::Occupied => metrics.occupied += count,
            }
            metrics.total += count;
        }
        metrics
    }
}

/// Landing page overview for staff.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardOverview {
    pub date: NaiveDate,
    /// Today's accepted reservations ordered by time.
    pub todays_reservations: Vec<Reservation>,
    pub pending_reservations: i64,
    pub tables: TableMetrics,
    /// Non-admin employees.
    pub staff_count: i64,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_metrics_from_counts() {
        let metrics = TableMetrics::from_counts(vec![
            (TableStatus::Available, 5),
            (TableStatus::Reserved, 2),
            (TableStatus::Occupied, 1),
        ]);
        assert_eq!(
            metrics,
            TableMetrics {
                total: 8,
                available: 5,
                reserved: 2,
                occupied: 1,
            }
        );
    }

    #[test]
    fn test_table_metrics_missing_statuses_are_zero() {
        let metrics = TableMetrics::from_counts(vec![(TableStatus::Reserved, 3)]);
        assert_eq!(metrics.available, 0);
        assert_eq!(metrics.total, 3);
    }
}
