//! Staff-triggered guest email routes.
//!
//! These send the same templates as the reservation lifecycle, for staff
//! who need to resend a message by hand.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::services::{ConfirmationNotice, RejectionNotice};
use serde::Serialize;
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;
use crate::services::EmailError;

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendEmailResponse {
    fn from_result(result: Result<(), EmailError>) -> (StatusCode, Json<Self>) {
        match result {
            Ok(()) => (
                StatusCode::OK,
                Json(Self {
                    success: true,
                    message: None,
                    error: None,
                }),
            ),
            Err(EmailError::Disabled) => (
                StatusCode::OK,
                Json(Self {
                    success: true,
                    message: Some("Email is disabled, nothing was sent".to_string()),
                    error: None,
                }),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Self {
                    success: false,
                    message: None,
                    error: Some(e.to_string()),
                }),
            ),
        }
    }
}

/// Send a reservation confirmation email.
///
/// POST /api/send-confirmation-email
pub async fn send_confirmation_email(
    State(state): State<AppState>,
    staff: StaffContext,
    Json(notice): Json<ConfirmationNotice>,
) -> Result<impl IntoResponse, ApiError> {
    notice.validate()?;

    let result = state.email.send_confirmation_email(&notice).await;
    log_outcome("confirmation", &staff, &result);
    Ok(SendEmailResponse::from_result(result))
}

/// Send a reservation rejection email.
///
/// POST /api/send-rejection-email
pub async fn send_rejection_email(
    State(state): State<AppState>,
    staff: StaffContext,
    Json(notice): Json<RejectionNotice>,
) -> Result<impl IntoResponse, ApiError> {
    notice.validate()?;

    let result = state.email.send_rejection_email(&notice).await;
    log_outcome("rejection", &staff, &result);
    Ok(SendEmailResponse::from_result(result))
}

fn log_outcome(kind: &str, staff: &StaffContext, result: &Result<(), EmailError>) {
    match result {
        Ok(()) => info!(kind, employee_id = %staff.employee_id, "Guest email sent by staff"),
        Err(EmailError::Disabled) => {
            info!(kind, employee_id = %staff.employee_id, "Guest email skipped, email disabled")
        }
        Err(e) => warn!(
            kind,
            employee_id = %staff.employee_id,
            error = %e,
            "Guest email failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let (status, Json(body)) = SendEmailResponse::from_result(Ok(()));
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
    }

    #[test]
    fn test_disabled_is_reported_as_success() {
        let (status, Json(body)) = SendEmailResponse::from_result(Err(EmailError::Disabled));
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        assert!(body.message.is_some());
    }

    #[test]
    fn test_failure_response() {
        let (status, Json(body)) = SendEmailResponse::from_result(Err(EmailError::SendFailed(
            "connection reset".to_string(),
        )));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("connection reset"));
        assert!(json.get("message").is_none());
    }
}
