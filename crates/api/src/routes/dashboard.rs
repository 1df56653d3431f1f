//! Staff dashboard route.

use axum::{extract::State, Json};
use chrono::Utc;
use domain::models::{DashboardOverview, Reservation, TableMetrics, TableStatus};
use persistence::entities::ReservationStatusDb;
use persistence::repositories::{EmployeeRepository, ReservationRepository, TableRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;

/// Today's accepted reservations with table and staff counts.
///
/// GET /api/dashboard/overview
pub async fn overview(
    State(state): State<AppState>,
    _staff: StaffContext,
) -> Result<Json<DashboardOverview>, ApiError> {
    let today = chrono::Local::now().date_naive();
    let reservations = ReservationRepository::new(state.pool.clone());

    let todays_reservations: Vec<Reservation> = reservations
        .find_accepted_on(today)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let pending_reservations = reservations
        .count_by_status(ReservationStatusDb::Pending)
        .await?;

    let table_counts = TableRepository::new(state.pool.clone())
        .count_by_status()
        .await?;
    let tables = TableMetrics::from_counts(
        table_counts
            .into_iter()
            .map(|row| (TableStatus::from(row.status), row.count)),
    );

    let staff_count = EmployeeRepository::new(state.pool.clone())
        .count_staff()
        .await?;

    Ok(Json(DashboardOverview {
        date: today,
        todays_reservations,
        pending_reservations,
        tables,
        staff_count,
        generated_at: Utc::now(),
    }))
}
