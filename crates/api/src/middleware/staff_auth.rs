//! Staff session authentication middleware.
//!
//! Validates the Bearer session token and loads the employee behind it on
//! every request, so deactivating an employee revokes access immediately.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::{Employee, EmployeeRole, EmployeeStatus};
use persistence::repositories::EmployeeRepository;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use shared::jwt::{extract_employee_id, JwtConfig};

/// The authenticated employee, inserted into request extensions.
#[derive(Debug, Clone, Serialize)]
pub struct StaffContext {
    pub employee_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: EmployeeRole,
}

impl StaffContext {
    pub fn is_admin(&self) -> bool {
        self.role == EmployeeRole::Admin
    }

    pub fn is_manager_or_admin(&self) -> bool {
        matches!(self.role, EmployeeRole::Manager | EmployeeRole::Admin)
    }
}

impl From<&Employee> for StaffContext {
    fn from(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id,
            email: employee.email.clone(),
            name: employee.name.clone(),
            role: employee.role,
        }
    }
}

/// Extracts the token from an `Authorization: Bearer ...` header value.
pub fn bearer_token(value: Option<&str>) -> Option<&str> {
    value
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolves the employee id carried by a session token.
pub fn session_employee_id(jwt: &JwtConfig, token: &str) -> Result<Uuid, String> {
    let claims = jwt
        .validate_token(token)
        .map_err(|e| format!("Invalid token: {}", e))?;
    extract_employee_id(&claims).map_err(|e| e.to_string())
}

/// Middleware that requires an authenticated, active employee.
pub async fn require_staff(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(token) = bearer_token(header_value) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    let employee_id = match session_employee_id(&state.jwt, token) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("Session validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    let repo = EmployeeRepository::new(state.pool.clone());
    let employee: Employee = match repo.find_by_id(employee_id).await {
        Ok(Some(entity)) => entity.into(),
        Ok(None) => {
            tracing::info!(employee_id = %employee_id, "Session for unknown employee");
            return unauthorized_response("Invalid or expired token");
        }
        Err(e) => {
            tracing::error!("Database error loading session employee: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    if employee.status != EmployeeStatus::Active {
        tracing::info!(
            employee_id = %employee.id,
            status = %employee.status,
            "Session rejected for non-active employee"
        );
        return unauthorized_response("Account is not active");
    }

    req.extensions_mut().insert(StaffContext::from(&employee));
    next.run(req).await
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
