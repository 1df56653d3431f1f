//! Employee repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{EmployeeEntity, EmployeeRoleDb, EmployeeStatusDb};
use crate::metrics::QueryTimer;

/// Partial update of an employee. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<EmployeeRoleDb>,
    pub status: Option<EmployeeStatusDb>,
}

/// Repository for employee database operations.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create an employee. The email must already be normalized.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        role: EmployeeRoleDb,
        status: EmployeeStatusDb,
    ) -> Result<EmployeeEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_employee");

        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            INSERT INTO employees (name, email, role, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role, status, last_login_at, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(role)
        .bind(status)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find employee by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_id");

        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, email, role, status, last_login_at, created_at, updated_at
            FROM employees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Find employee by (normalized) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_employee_by_email");

        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, email, role, status, last_login_at, created_at, updated_at
            FROM employees
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// List non-admin employees ordered by name.
    pub async fn list_staff(
        &self,
        role: Option<EmployeeRoleDb>,
        status: Option<EmployeeStatusDb>,
    ) -> Result<Vec<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_staff");

        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            SELECT id, name, email, role, status, last_login_at, created_at, updated_at
            FROM employees
            WHERE role <> 'admin'
              AND ($1::employee_role IS NULL OR role = $1)
              AND ($2::employee_status IS NULL OR status = $2)
            ORDER BY name ASC, created_at ASC
            "#,
        )
        .bind(role)
        .bind(status)
        .fetch_all(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Number of non-admin employees.
    pub async fn count_staff(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_staff");

        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE role <> 'admin'",
        )
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Returns true if at least one admin exists.
    pub async fn admin_exists(&self) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("admin_exists");

        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM employees WHERE role = 'admin')",
        )
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Partially update an employee.
    pub async fn update(
        &self,
        id: Uuid,
        update: &EmployeeUpdate,
    ) -> Result<Option<EmployeeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_employee");

        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            UPDATE employees
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING id, name, email, role, status, last_login_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(update.role)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Record a successful login, optionally activating the employee.
    pub async fn record_login(
        &self,
        id: Uuid,
        new_status: Option<EmployeeStatusDb>,
    ) -> Result<EmployeeEntity, sqlx::Error> {
        let timer = QueryTimer::new("record_employee_login");

        let result = sqlx::query_as::<_, EmployeeEntity>(
            r#"
            UPDATE employees
            SET last_login_at = NOW(),
                status = COALESCE($2, status)
            WHERE id = $1
            RETURNING id, name, email, role, status, last_login_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(new_status)
        .fetch_one(&self.pool)
        .await;

        timer.record();
        result
    }

    /// Delete an employee. Returns true if a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_employee");

        let result = sqlx::query("DELETE FROM employees WHERE id = $1 AND role <> 'admin'")
            .bind(id)
            .execute(&self.pool)
            .await;

        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }
}
