//! Employee management routes (admin only).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::employee::{
    CreateEmployeeRequest, InviteEmployeeResponse, ListEmployeesQuery, ListEmployeesResponse,
    UpdateEmployeeRequest,
};
use domain::models::{Employee, EmployeeError, EmployeeStatus};
use domain::services::{NotificationReport, NotificationResult};
use persistence::entities::{EmployeeRoleDb, EmployeeStatusDb};
use persistence::repositories::{EmployeeRepository, EmployeeUpdate};
use shared::validation::normalize_email;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::StaffContext;
use crate::services::AuthService;

/// Invite a new employee.
///
/// POST /api/employees
///
/// The employee starts as `pending` and receives an invite link. A failed
/// invite email is reported in the response but keeps the employee.
pub async fn create_employee(
    State(state): State<AppState>,
    admin: StaffContext,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<InviteEmployeeResponse>), ApiError> {
    request.validate()?;

    let email = normalize_email(&request.email);
    let employee: Employee = EmployeeRepository::new(state.pool.clone())
        .create(
            request.name.trim(),
            &email,
            EmployeeRoleDb::from(request.role),
            EmployeeStatusDb::Pending,
        )
        .await
        .map_err(duplicate_email)?
        .into();

    info!(
        employee_id = %employee.id,
        role = %employee.role,
        invited_by = %admin.employee_id,
        "Employee created"
    );

    let result = AuthService::from_state(&state).send_invite(&employee).await?;
    Ok((StatusCode::CREATED, Json(invite_response(employee, result))))
}

/// List non-admin employees.
///
/// GET /api/employees?role=&status=
pub async fn list_employees(
    State(state): State<AppState>,
    _admin: StaffContext,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<Json<ListEmployeesResponse>, ApiError> {
    let employees: Vec<Employee> = EmployeeRepository::new(state.pool.clone())
        .list_staff(query.role.map(Into::into), query.status.map(Into::into))
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let total = employees.len();
    Ok(Json(ListEmployeesResponse { employees, total }))
}

/// Get a single employee.
///
/// GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    _admin: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError> {
    Ok(Json(find_employee(&state, id).await?))
}

/// Update an employee.
///
/// PATCH /api/employees/:id
///
/// Status can only change once the employee has accepted the invite, and
/// never back to `pending`. Admin accounts cannot be modified here.
pub async fn update_employee(
    State(state): State<AppState>,
    admin: StaffContext,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, ApiError> {
    request.validate()?;

    let current = find_employee(&state, id).await?;
    current.ensure_manageable()?;
    if let Some(status) = request.status {
        current.check_status_change(status)?;
    }

    let update = EmployeeUpdate {
        name: request.name.map(|n| n.trim().to_string()),
        email: request.email.as_deref().map(normalize_email),
        role: request.role.map(Into::into),
        status: request.status.map(Into::into),
    };

    let employee: Employee = EmployeeRepository::new(state.pool.clone())
        .update(id, &update)
        .await
        .map_err(duplicate_email)?
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))?
        .into();

    info!(
        employee_id = %id,
        role = %employee.role,
        status = %employee.status,
        updated_by = %admin.employee_id,
        "Employee updated"
    );

    Ok(Json(employee))
}

/// Delete an employee.
///
/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    admin: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let current = find_employee(&state, id).await?;
    current.ensure_manageable()?;

    if !EmployeeRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::NotFound("Employee not found".into()));
    }

    info!(employee_id = %id, deleted_by = %admin.employee_id, "Employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Send a fresh invite link, invalidating earlier ones.
///
/// POST /api/employees/:id/invite
///
/// Only possible while the employee is still `pending`.
pub async fn resend_invite(
    State(state): State<AppState>,
    _admin: StaffContext,
    Path(id): Path<Uuid>,
) -> Result<Json<InviteEmployeeResponse>, ApiError> {
    let employee = find_employee(&state, id).await?;
    employee.ensure_manageable()?;
    if employee.status != EmployeeStatus::Pending {
        return Err(EmployeeError::AlreadyActivated.into());
    }

    let result = AuthService::from_state(&state).send_invite(&employee).await?;
    Ok(Json(invite_response(employee, result)))
}

async fn find_employee(state: &AppState, id: Uuid) -> Result<Employee, ApiError> {
    EmployeeRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| ApiError::NotFound("Employee not found".into()))
}

fn invite_response(employee: Employee, result: NotificationResult) -> InviteEmployeeResponse {
    let invite_sent = matches!(result, NotificationResult::Sent);
    let warning = match result {
        NotificationResult::Skipped => Some("Email is disabled, the invite was not sent".into()),
        other => NotificationReport::from(other).warning,
    };
    InviteEmployeeResponse {
        employee,
        invite_sent,
        warning,
    }
}

fn duplicate_email(err: sqlx::Error) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            ApiError::Conflict("An employee with this email already exists".into())
        }
        _ => err.into(),
    }
}
