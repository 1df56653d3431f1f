//! Reservation routes: public booking and the staff lifecycle actions.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::reservation::{
    AssignTableRequest, CreateReservationRequest, CreateReservationResponse,
    ListReservationsQuery, ListReservationsResponse, UpdateReservationRequest,
};
use domain::models::Reservation;
use domain::services::ReservationAction;
use persistence::repositories::{ReservationFilter, ReservationRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;
use crate::services::{ActionOutcome, ReservationService};

/// Submit a booking request.
///
/// POST /api/reservations
///
/// Public and rate limited. The reservation is stored as `pending`.
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<Json<CreateReservationResponse>, ApiError> {
    request.validate()?;

    let reservation = ReservationService::from_state(&state)
        .book(request, state.config.limits.max_party_size)
        .await?;

    Ok(Json(CreateReservationResponse {
        success: true,
        data: reservation,
    }))
}

/// List reservations, newest date first.
///
/// GET /api/reservations?status=&date=&search=
pub async fn list_reservations(
    State(state): State<AppState>,
    _staff: StaffContext,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<ListReservationsResponse>, ApiError> {
    let filter = ReservationFilter {
        status: query.status.map(Into::into),
        date: query.date,
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    let reservations: Vec<Reservation> = ReservationRepository::new(state.pool.clone())
        .list(&filter)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = reservations.len();
    Ok(Json(ListReservationsResponse {
        reservations,
        total,
    }))
}

/// Get a single reservation.
///
/// GET /api/reservations/:id
pub async fn get_reservation(
    State(state): State<AppState>,
    _staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = ReservationRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reservation not found".into()))?;

    Ok(Json(reservation.into()))
}

/// Edit date, time, party size or table.
///
/// PATCH /api/reservations/:id
pub async fn update_reservation(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<ActionOutcome>, ApiError> {
    request.validate()?;
    run_action(&state, &staff, id, ReservationAction::Edit(request)).await
}

/// Assign a table to a reservation.
///
/// PUT /api/reservations/:id/table
pub async fn assign_table(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignTableRequest>,
) -> Result<Json<ActionOutcome>, ApiError> {
    run_action(&state, &staff, id, ReservationAction::AssignTable(request.table_id)).await
}

/// Accept a reservation and email the guest.
///
/// POST /api/reservations/:id/confirm
///
/// A table must be assigned first.
pub async fn confirm_reservation(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, ApiError> {
    run_action(&state, &staff, id, ReservationAction::Confirm).await
}

/// Cancel a reservation, release its table and email the guest.
///
/// POST /api/reservations/:id/cancel
pub async fn cancel_reservation(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, ApiError> {
    run_action(&state, &staff, id, ReservationAction::Cancel).await
}

/// Mark the guests of an accepted reservation as arrived.
///
/// POST /api/reservations/:id/arrive
pub async fn mark_arrived(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, ApiError> {
    run_action(&state, &staff, id, ReservationAction::MarkArrived).await
}

/// Delete a reservation.
///
/// DELETE /api/reservations/:id
///
/// Requires manager or admin role.
pub async fn delete_reservation(
    State(state): State<AppState>,
    staff: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
    let deleted = ReservationService::from_state(&state).delete(id).await?;

    info!(
        reservation_id = %id,
        employee_id = %staff.employee_id,
        "Reservation removed by staff"
    );

    Ok(Json(deleted))
}

async fn run_action(
    state: &AppState,
    staff: &StaffContext,
    id: Uuid,
    action: ReservationAction,
) -> Result<Json<ActionOutcome>, ApiError> {
    let name = action.name();
    let outcome = ReservationService::from_state(state).apply(id, action).await?;

    info!(
        reservation_id = %id,
        employee_id = %staff.employee_id,
        action = name,
        notification = ?outcome.notification.status,
        "Staff reservation action"
    );

    Ok(Json(outcome))
}
