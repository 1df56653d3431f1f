//! Employee (staff account) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Staff role. Determines which areas of the dashboard API are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Waiter,
    Manager,
    Admin,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Waiter => "waiter",
            EmployeeRole::Manager => "manager",
            EmployeeRole::Admin => "admin",
        }
    }
}

impl FromStr for EmployeeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiter" => Ok(EmployeeRole::Waiter),
            "manager" => Ok(EmployeeRole::Manager),
            "admin" => Ok(EmployeeRole::Admin),
            _ => Err(format!("Invalid employee role: {}", s)),
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account status of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    /// Invited, has not logged in yet.
    Pending,
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Pending => "pending",
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for EmployeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(EmployeeStatus::Pending),
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            _ => Err(format!("Invalid employee status: {}", s)),
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Business rule violations in employee management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeError {
    #[error("Admin accounts cannot be managed through this API")]
    AdminProtected,

    #[error("Status cannot be changed until the employee has accepted the invite")]
    StatusLocked,

    #[error("Status cannot be set back to pending")]
    CannotRevertToPending,

    #[error("Invites can only be resent to pending employees")]
    AlreadyActivated,
}

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub status: EmployeeStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn is_admin(&self) -> bool {
        self.role == EmployeeRole::Admin
    }

    /// Fails for admin rows, which are hidden from employee management.
    pub fn ensure_manageable(&self) -> Result<(), EmployeeError> {
        if self.is_admin() {
            Err(EmployeeError::AdminProtected)
        } else {
            Ok(())
        }
    }

    /// Checks a requested status change against the invite workflow.
    pub fn check_status_change(&self, requested: EmployeeStatus) -> Result<(), EmployeeError> {
        if requested == self.status {
            return Ok(());
        }
        if self.status == EmployeeStatus::Pending {
            return Err(EmployeeError::StatusLocked);
        }
        if requested == EmployeeStatus::Pending {
            return Err(EmployeeError::CannotRevertToPending);
        }
        Ok(())
    }

    /// Status after a successful magic-link login, or `None` if unchanged.
    pub fn status_after_login(&self) -> Option<EmployeeStatus> {
        match self.status {
            EmployeeStatus::Pending => Some(EmployeeStatus::Active),
            _ => None,
        }
    }
}

fn validate_assignable_role(role: &EmployeeRole) -> Result<(), ValidationError> {
    if *role == EmployeeRole::Admin {
        let mut err = ValidationError::new("role_not_assignable");
        err.message = Some("Role must be waiter or manager".into());
        return Err(err);
    }
    Ok(())
}

/// Request payload for creating (inviting) an employee.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_assignable_role"))]
    pub role: EmployeeRole,
}

/// Request payload for updating an employee (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_assignable_role"))]
    pub role: Option<EmployeeRole>,

    pub status: Option<EmployeeStatus>,
}

/// Query parameters for listing employees.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEmployeesQuery {
    pub role: Option<EmployeeRole>,
    pub status: Option<EmployeeStatus>,
}

/// Response for listing employees.
#[derive(Debug, Clone, Serialize)]
pub struct ListEmployeesResponse {
    pub employees: Vec<Employee>,
    pub total: usize,
}

/// Response after creating an employee or resending an invite.
#[derive(Debug, Clone, Serialize)]
pub struct InviteEmployeeResponse {
    pub employee: Employee,
    pub invite_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
