//! Role-based access control for staff routes.
//!
//! Must run after `require_staff`, which inserts the `StaffContext`.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::EmployeeRole;
use serde_json::json;

use crate::middleware::staff_auth::StaffContext;

const MANAGER_ROLES: &[EmployeeRole] = &[EmployeeRole::Manager, EmployeeRole::Admin];
const ADMIN_ROLES: &[EmployeeRole] = &[EmployeeRole::Admin];

/// Allows managers and admins.
pub async fn require_manager(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, MANAGER_ROLES).await
}

/// Allows admins only.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    require_role_impl(req, next, ADMIN_ROLES).await
}

async fn require_role_impl(req: Request<Body>, next: Next, allowed: &[EmployeeRole]) -> Response {
    let Some(staff) = req.extensions().get::<StaffContext>() else {
        tracing::warn!("RBAC middleware called without StaffContext in extensions");
        return unauthorized_response("Authentication required");
    };

    if !allowed.contains(&staff.role) {
        tracing::info!(
            employee_id = %staff.employee_id,
            role = %staff.role,
            path = %req.uri().path(),
            "Access denied for role"
        );
        return forbidden_response("You do not have permission to perform this action");
    }

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

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}
