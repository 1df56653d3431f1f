//! Staff authentication routes.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;
use crate::services::{AuthService, SessionResponse};

/// Request payload for a login link.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginLinkRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request payload for exchanging a link token.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(length(min = 1, max = 256, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request a login link by email.
///
/// POST /api/auth/login-link
///
/// Always answers 202 whether or not the email belongs to an employee.
pub async fn request_login_link(
    State(state): State<AppState>,
    Json(request): Json<LoginLinkRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    request.validate()?;

    AuthService::from_state(&state)
        .request_login_link(&request.email)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "If this email belongs to an active employee, a login link has been sent"
                .to_string(),
        }),
    ))
}

/// Exchange a login or invite token for a session.
///
/// POST /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let session = AuthService::from_state(&state).verify(&request.token).await?;
    Ok(Json(session))
}

/// Current staff member.
///
/// GET /api/auth/me
pub async fn me(staff: StaffContext) -> Json<StaffContext> {
    Json(staff)
}
