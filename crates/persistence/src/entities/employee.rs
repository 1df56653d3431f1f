//! Employee entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{EmployeeRole, EmployeeStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for employee role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
pub enum EmployeeRoleDb {
    Waiter,
    Manager,
    Admin,
}

impl From<EmployeeRoleDb> for EmployeeRole {
    fn from(db: EmployeeRoleDb) -> Self {
        match db {
            EmployeeRoleDb::Waiter => EmployeeRole::Waiter,
            EmployeeRoleDb::Manager => EmployeeRole::Manager,
            EmployeeRoleDb::Admin => EmployeeRole::Admin,
        }
    }
}

impl From<EmployeeRole> for EmployeeRoleDb {
    fn from(role: EmployeeRole) -> Self {
        match role {
            EmployeeRole::Waiter => EmployeeRoleDb::Waiter,
            EmployeeRole::Manager => EmployeeRoleDb::Manager,
            EmployeeRole::Admin => EmployeeRoleDb::Admin,
        }
    }
}

/// Database enum for employee status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "lowercase")]
pub enum EmployeeStatusDb {
    Pending,
    Active,
    Inactive,
}

impl From<EmployeeStatusDb> for EmployeeStatus {
    fn from(db: EmployeeStatusDb) -> Self {
        match db {
            EmployeeStatusDb::Pending => EmployeeStatus::Pending,
            EmployeeStatusDb::Active => EmployeeStatus::Active,
            EmployeeStatusDb::Inactive => EmployeeStatus::Inactive,
        }
    }
}

impl From<EmployeeStatus> for EmployeeStatusDb {
    fn from(status: EmployeeStatus) -> Self {
        match status {
            EmployeeStatus::Pending => EmployeeStatusDb::Pending,
            EmployeeStatus::Active => EmployeeStatusDb::Active,
            EmployeeStatus::Inactive => EmployeeStatusDb::Inactive,
        }
    }
}

/// Database row mapping for the employees table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: EmployeeRoleDb,
    pub status: EmployeeStatusDb,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeEntity> for domain::models::Employee {
    fn from(entity: EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            role: entity.role.into(),
            status: entity.status.into(),
            last_login_at: entity.last_login_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
