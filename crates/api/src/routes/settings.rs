//! Restaurant settings routes.

use axum::{extract::State, Json};
use domain::models::settings::{SettingsResponse, UpdateSettingsRequest};
use domain::models::RestaurantSettings;
use persistence::repositories::SettingsRepository;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;

/// Opening hours, closed dates and bookable time slots.
///
/// GET /api/settings
///
/// Public. Falls back to the defaults when nothing is stored yet.
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings: RestaurantSettings = SettingsRepository::new(state.pool.clone())
        .get()
        .await?
        .map(Into::into)
        .unwrap_or_default();

    Ok(Json(settings.into()))
}

/// Replace the settings.
///
/// PUT /api/settings
///
/// Requires admin role.
pub async fn update_settings(
    State(state): State<AppState>,
    admin: StaffContext,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let request = request.normalized()?;

    let settings: RestaurantSettings = SettingsRepository::new(state.pool.clone())
        .upsert(
            request.opening_time,
            request.closing_time,
            &request.closed_dates,
        )
        .await?
        .into();

    info!(
        opening_time = %settings.opening_time,
        closing_time = %settings.closing_time,
        closed_dates = settings.closed_dates.len(),
        updated_by = %admin.employee_id,
        "Restaurant settings updated"
    );

    Ok(Json(settings.into()))
}
