//! Admin bootstrap for initial setup.
//!
//! Creates the first admin employee on startup when `admin.bootstrap_email`
//! is configured and no admin exists yet. The admin then signs in through a
//! regular login link.

use domain::models::Employee;
use persistence::entities::{EmployeeRoleDb, EmployeeStatusDb};
use persistence::repositories::EmployeeRepository;
use shared::validation::normalize_email;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminBootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Bootstrap the admin employee if configured and not already done.
///
/// Idempotent: returns `None` when nothing was created.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminBootstrapConfig,
) -> Result<Option<Employee>, BootstrapError> {
    if config.bootstrap_email.trim().is_empty() {
        return Ok(None);
    }

    let email = normalize_email(&config.bootstrap_email);
    if !email.contains('@') {
        return Err(BootstrapError::Config(format!(
            "admin.bootstrap_email is not an email address: {}",
            email
        )));
    }

    let repo = EmployeeRepository::new(pool.clone());

    if repo.admin_exists().await? {
        info!("Admin employee already exists - skipping bootstrap");
        return Ok(None);
    }

    if let Some(existing) = repo.find_by_email(&email).await? {
        warn!(
            employee_id = %existing.id,
            "Bootstrap email belongs to a non-admin employee - skipping bootstrap"
        );
        return Ok(None);
    }

    let name = match config.bootstrap_name.trim() {
        "" => "Administrator",
        name => name,
    };

    let admin: Employee = repo
        .create(name, &email, EmployeeRoleDb::Admin, EmployeeStatusDb::Active)
        .await?
        .into();

    info!(employee_id = %admin.id, "Bootstrap admin employee created");
    warn!("SECURITY: Remove RB__ADMIN__BOOTSTRAP_EMAIL from configuration after initial setup");

    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_error_display() {
        let err = BootstrapError::Config("bad".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad");
    }
}
