//! Reservation statistics route.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::stats::StatsQuery;
use domain::models::{compute_stats, ReservationStats, ReservationStatus};
use persistence::repositories::ReservationRepository;
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;

/// Aggregated reservation statistics for the last 7, 30, 90 or 365 days.
///
/// GET /api/stats?days=30
///
/// Requires manager or admin role.
pub async fn get_stats(
    State(state): State<AppState>,
    _staff: StaffContext,
    Query(query): Query<StatsQuery>,
) -> Result<Json<ReservationStats>, ApiError> {
    let range = query.range()?;
    let today = chrono::Local::now().date_naive();

    let rows = ReservationRepository::new(state.pool.clone())
        .stats_rows(range.start(today), today)
        .await?;

    debug!(days = range.days(), rows = rows.len(), "Computing reservation stats");

    let stats = compute_stats(
        rows.into_iter()
            .map(|row| (row.date, ReservationStatus::from(row.status))),
        range,
        today,
    );

    Ok(Json(stats))
}
