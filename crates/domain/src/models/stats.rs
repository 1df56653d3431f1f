//! Reservation statistics.
//!
//! Aggregates are recomputed from raw rows on every request and never stored.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::reservation::ReservationStatus;

/// Days in each half of the week-over-week comparison.
const GROWTH_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("Invalid range: {0} days. Must be one of: 7, 30, 90, 365")]
    InvalidRange(u32),
}

/// Trailing window selectable on the statistics page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl StatsRange {
    pub fn days(&self) -> u32 {
        match self {
            StatsRange::Week => 7,
            StatsRange::Month => 30,
            StatsRange::Quarter => 90,
            StatsRange::Year => 365,
        }
    }

    pub fn from_days(days: u32) -> Result<Self, StatsError> {
        match days {
            7 => Ok(StatsRange::Week),
            30 => Ok(StatsRange::Month),
            90 => Ok(StatsRange::Quarter),
            365 => Ok(StatsRange::Year),
            other => Err(StatsError::InvalidRange(other)),
        }
    }

    /// First day of the window ending at `today` (inclusive on both ends).
    pub fn start(&self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(i64::from(self.days()))
    }
}

/// Query parameters for the statistics endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<u32>,
}

impl StatsQuery {
    pub fn range(&self) -> Result<StatsRange, StatsError> {
        self.days.map_or(Ok(StatsRange::default()), StatsRange::from_days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Reservations per ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyCount {
    pub year: i32,
    pub week: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub count: usize,
    /// Share of the total, rounded to a whole percent.
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationStats {
    pub days: u32,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: usize,
    pub average_daily: f64,
    pub peak_day: Option<DailyCount>,
    /// Week-over-week growth in percent; 0 when there is not enough data.
    pub growth_rate: f64,
    pub daily: Vec<DailyCount>,
    pub weekly: Vec<WeeklyCount>,
    pub by_status: Vec<StatusCount>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Aggregates `(date, status)` rows for the given window.
///
/// Rows outside `[range.start(today), today]` are ignored.
pub fn compute_stats<I>(rows: I, range: StatsRange, today: NaiveDate) -> ReservationStats
where
    I: IntoIterator<Item = (NaiveDate, ReservationStatus)>,
{
    let from = range.start(today);

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut per_week: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    let mut per_status: BTreeMap<u8, (ReservationStatus, usize)> = BTreeMap::new();
    let mut total = 0usize;

    for (date, status) in rows {
        if date < from || date > today {
            continue;
        }
        total += 1;
        *per_day.entry(date).or_default() += 1;

        let iso = date.iso_week();
        *per_week.entry((iso.year(), iso.week())).or_default() += 1;

        per_status.entry(status_order(status)).or_insert((status, 0)).1 += 1;
    }

    let daily: Vec<DailyCount> = per_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect();

    let average_daily = if daily.is_empty() {
        0.0
    } else {
        round1(total as f64 / daily.len() as f64)
    };

    // Earliest day wins ties.
    let peak_day = daily
        .iter()
        .fold(None::<&DailyCount>, |best, day| match best {
            Some(b) if b.count >= day.count => Some(b),
            _ => Some(day),
        })
        .cloned();

    let growth_rate = if daily.len() > 2 * GROWTH_WINDOW {
        let first: usize = daily[..GROWTH_WINDOW].iter().map(|d| d.count).sum();
        let last: usize = daily[daily.len() - GROWTH_WINDOW..]
            .iter()
            .map(|d| d.count)
            .sum();
        if first > 0 {
            round1((last as f64 - first as f64) / first as f64 * 100.0)
        } else {
            0.0
        }
    } else {
        0.0
    };

    let weekly = per_week
        .into_iter()
        .map(|((year, week), count)| WeeklyCount { year, week, count })
        .collect();

    let by_status = per_status
        .into_values()
        .map(|(status, count)| StatusCount {
            status,
            count,
            percentage: (count as f64 / total as f64 * 100.0).round() as u32,
        })
        .collect();

    ReservationStats {
        days: range.days(),
        from,
        to: today,
        total,
        average_daily,
        peak_day,
        growth_rate,
        daily,
        weekly,
        by_status,
    }
}

fn status_order(status: ReservationStatus) -> u8 {
    match status {
        ReservationStatus::Pending => 0,
        ReservationStatus::Accepted => 1,
        ReservationStatus::Arrived => 2,
        ReservationStatus::Cancelled => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_range_from_days() {
        assert_eq!(StatsRange::from_days(7).unwrap(), StatsRange::Week);
        assert_eq!(StatsRange::from_days(365).unwrap(), StatsRange::Year);
        assert_eq!(StatsRange::from_days(14), Err(StatsError::InvalidRange(14)));
    }

    #[test]
    fn test_query_defaults_to_thirty_days() {
        assert_eq!(StatsQuery::default().range().unwrap(), StatsRange::Month);
        assert!(StatsQuery { days: Some(0) }.range().is_err());
    }

    #[test]
    fn test_empty_stats() {
        let stats = compute_stats(Vec::<(NaiveDate, ReservationStatus)>::new(), StatsRange::Week, d("2025-06-10"));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_daily, 0.0);
        assert!(stats.peak_day.is_none());
        assert_eq!(stats.growth_rate, 0.0);
        assert!(stats.by_status.is_empty());
        assert_eq!(stats.from, d("2025-06-03"));
    }

    #[test]
    fn test_daily_weekly_and_status() {
        let rows = vec![
            (d("2025-06-09"), Pending),
            (d("2025-06-02"), Accepted),
            (d("2025-06-09"), Cancelled),
            (d("2025-06-03"), Accepted),
            (d("2025-06-09"), Accepted),
        ];
        let stats = compute_stats(rows, StatsRange::Month, d("2025-06-10"));

        assert_eq!(stats.total, 5);
        assert_eq!(
            stats.daily,
            vec![
                DailyCount { date: d("2025-06-02"), count: 1 },
                DailyCount { date: d("2025-06-03"), count: 1 },
                DailyCount { date: d("2025-06-09"), count: 3 },
            ]
        );
        // 5 reservations over 3 distinct days
        assert_eq!(stats.average_daily, 1.7);
        assert_eq!(
            stats.peak_day,
            Some(DailyCount { date: d("2025-06-09"), count: 3 })
        );

        // 2025-06-02 and 06-03 are ISO week 23, 06-09 is week 24
        assert_eq!(
            stats.weekly,
            vec![
                WeeklyCount { year: 2025, week: 23, count: 2 },
                WeeklyCount { year: 2025, week: 24, count: 3 },
            ]
        );

        assert_eq!(
            stats.by_status,
            vec![
                StatusCount { status: Pending, count: 1, percentage: 20 },
                StatusCount { status: Accepted, count: 3, percentage: 60 },
                StatusCount { status: Cancelled, count: 1, percentage: 20 },
            ]
        );
    }

    #[test]
    fn test_rows_outside_window_ignored() {
        let rows = vec![
            (d("2025-05-01"), Pending),
            (d("2025-06-11"), Pending),
            (d("2025-06-05"), Pending),
        ];
        let stats = compute_stats(rows, StatsRange::Week, d("2025-06-10"));
        assert_eq!(stats.total, 1);
    }

    #[test]
    fn test_peak_day_prefers_earliest() {
        let rows = vec![
            (d("2025-06-05"), Pending),
            (d("2025-06-04"), Pending),
        ];
        let stats = compute_stats(rows, StatsRange::Week, d("2025-06-10"));
        assert_eq!(stats.peak_day.unwrap().date, d("2025-06-04"));
    }

    #[test]
    fn test_growth_needs_more_than_two_weeks_of_buckets() {
        let today = d("2025-06-30");
        let rows: Vec<_> = (0..14).map(|i| (today - Duration::days(i), Pending)).collect();
        let stats = compute_stats(rows, StatsRange::Month, today);
        assert_eq!(stats.growth_rate, 0.0);
    }

    #[test]
    fn test_growth_compares_first_and_last_seven_buckets() {
        let today = d("2025-06-30");
        let mut rows = Vec::new();
        // 15 distinct days; the latest 7 have two reservations each
        for i in 0..15 {
            let date = today - Duration::days(i);
            rows.push((date, Accepted));
            if i < 7 {
                rows.push((date, Pending));
            }
        }
        let stats = compute_stats(rows, StatsRange::Month, today);
        // first week 7, last week 14
        assert_eq!(stats.growth_rate, 100.0);
    }

    #[test]
    fn test_growth_rounded_to_one_decimal() {
        let today = d("2025-06-30");
        let mut rows = Vec::new();
        for i in 0..15 {
            let date = today - Duration::days(i);
            rows.push((date, Accepted));
            // one extra in the earliest bucket: first week 8, last week 7
            if i == 14 {
                rows.push((date, Accepted));
            }
        }
        let stats = compute_stats(rows, StatsRange::Month, today);
        assert_eq!(stats.growth_rate, -12.5);
    }
}
