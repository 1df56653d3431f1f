//! Reservation booking and lifecycle orchestration.
//!
//! Every staff action runs in one transaction: the reservation row and the
//! tables it touches are locked, the domain planner decides what changes,
//! the writes are applied and committed, and only then is the guest emailed.
//! A failed email never rolls back a committed change.

use domain::models::reservation::CreateReservationRequest;
use domain::models::{BookingError, Reservation, RestaurantSettings, RestaurantTable};
use domain::services::{
    plan_transition, GuestNotifier, LifecycleError, NotificationReport, NotificationResult,
    ReservationAction,
};
use persistence::repositories::{ReservationRepository, SettingsRepository, TableRepository};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::metrics::{record_reservation_action, record_reservation_created};

#[derive(Debug, Error)]
pub enum ReservationServiceError {
    #[error("Reservation not found")]
    NotFound,

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of a staff action on a reservation.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub reservation: Reservation,
    pub notification: NotificationReport,
}

pub struct ReservationService {
    pool: PgPool,
    notifier: Arc<dyn GuestNotifier>,
}

impl ReservationService {
    pub fn new(pool: PgPool, notifier: Arc<dyn GuestNotifier>) -> Self {
        Self { pool, notifier }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pool.clone(), state.notifier.clone())
    }

    /// Current settings, falling back to the defaults if the row is missing.
    pub async fn settings(&self) -> Result<RestaurantSettings, sqlx::Error> {
        Ok(SettingsRepository::new(self.pool.clone())
            .get()
            .await?
            .map(Into::into)
            .unwrap_or_default())
    }

    /// Record a public booking as `pending` without a table.
    pub async fn book(
        &self,
        request: CreateReservationRequest,
        max_party_size: i32,
    ) -> Result<Reservation, ReservationServiceError> {
        let settings = self.settings().await?;
        let today = chrono::Local::now().date_naive();
        let new_reservation = request.into_new_reservation(&settings, today, max_party_size)?;

        let reservation: Reservation = ReservationRepository::new(self.pool.clone())
            .create(&new_reservation)
            .await?
            .into();

        record_reservation_created();
        info!(
            reservation_id = %reservation.id,
            date = %reservation.date,
            guests = reservation.guests,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Apply a staff action, then notify the guest if the plan calls for it.
    pub async fn apply(
        &self,
        id: Uuid,
        action: ReservationAction,
    ) -> Result<ActionOutcome, ReservationServiceError> {
        let mut tx = self.pool.begin().await?;

        let current: Reservation = ReservationRepository::lock_for_update(&mut tx, id)
            .await?
            .ok_or(ReservationServiceError::NotFound)?
            .into();

        let table_ids = action.tables_to_lock(&current);
        let tables: Vec<RestaurantTable> = if table_ids.is_empty() {
            Vec::new()
        } else {
            TableRepository::lock_many(&mut tx, &table_ids)
                .await?
                .into_iter()
                .map(Into::into)
                .collect()
        };

        let plan = plan_transition(&current, &action, &tables)?;

        if plan.is_noop() {
            tx.rollback().await?;
            info!(
                reservation_id = %id,
                action = action.name(),
                status = %current.status,
                "Reservation action already applied"
            );
            return Ok(ActionOutcome {
                reservation: current,
                notification: NotificationResult::Skipped.into(),
            });
        }

        for update in &plan.table_updates {
            TableRepository::set_status(&mut tx, update.table_id, update.status.into()).await?;
        }
        let updated: Reservation = ReservationRepository::apply_plan(&mut tx, id, &plan)
            .await?
            .into();

        tx.commit().await?;

        record_reservation_action(action.name());
        info!(
            reservation_id = %id,
            action = action.name(),
            from = %current.status,
            to = %updated.status,
            table_id = ?updated.table_id,
            "Reservation transitioned"
        );

        let notification = match &plan.notice {
            Some(notice) => self.notifier.notify(notice).await,
            None => NotificationResult::Skipped,
        };

        Ok(ActionOutcome {
            reservation: updated,
            notification: notification.into(),
        })
    }

    /// Delete a reservation, freeing its table.
    pub async fn delete(&self, id: Uuid) -> Result<Reservation, ReservationServiceError> {
        let deleted: Reservation = ReservationRepository::new(self.pool.clone())
            .delete(id)
            .await?
            .ok_or(ReservationServiceError::NotFound)?
            .into();

        info!(reservation_id = %id, status = %deleted.status, "Reservation deleted");
        Ok(deleted)
    }
}
