//! Passwordless staff authentication.
//!
//! Employees receive single-use links by email (invites and login links).
//! Only the SHA-256 of a link token is stored; verifying it issues an HS256
//! session token whose subject is the employee id.

use chrono::{Duration, Utc};
use domain::models::{Employee, EmployeeStatus};
use domain::services::NotificationResult;
use persistence::entities::LoginTokenPurposeDb;
use persistence::repositories::{EmployeeRepository, LoginTokenRepository};
use serde::Serialize;
use shared::crypto::{generate_secure_token, mask_email, sha256_hex};
use shared::jwt::{JwtConfig, JwtError};
use shared::validation::normalize_email;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::config::LimitsConfig;
use crate::services::email::{EmailError, EmailService, MagicLinkKind};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired login link")]
    InvalidToken,

    #[error("Account is inactive")]
    Inactive,

    #[error("Token error: {0}")]
    Jwt(#[from] JwtError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Issued staff session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub employee: Employee,
}

/// Authentication service.
pub struct AuthService {
    pool: PgPool,
    jwt: Arc<JwtConfig>,
    email: EmailService,
    login_link_ttl_minutes: i64,
    invite_ttl_hours: i64,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>, email: EmailService, limits: &LimitsConfig) -> Self {
        Self {
            pool,
            jwt,
            email,
            login_link_ttl_minutes: limits.login_link_ttl_minutes,
            invite_ttl_hours: limits.invite_ttl_hours,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.pool.clone(),
            state.jwt.clone(),
            state.email.clone(),
            &state.config.limits,
        )
    }

    /// Email a login link to an active employee.
    ///
    /// Unknown or non-active addresses are ignored without an error so the
    /// caller cannot probe which emails belong to staff.
    pub async fn request_login_link(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email);
        let repo = EmployeeRepository::new(self.pool.clone());

        let employee: Employee = match repo.find_by_email(&email).await? {
            Some(entity) => entity.into(),
            None => {
                debug!(email = %mask_email(&email), "Login link requested for unknown email");
                return Ok(());
            }
        };

        if employee.status != EmployeeStatus::Active {
            debug!(
                employee_id = %employee.id,
                status = %employee.status,
                "Login link requested for non-active employee"
            );
            return Ok(());
        }

        let token = self
            .issue_token(
                employee.id,
                LoginTokenPurposeDb::Login,
                Duration::minutes(self.login_link_ttl_minutes),
            )
            .await?;

        let valid_for = format!("{} minutes", self.login_link_ttl_minutes);
        match self
            .email
            .send_magic_link(&employee.email, &employee.name, &token, MagicLinkKind::Login, &valid_for)
            .await
        {
            Ok(()) => info!(employee_id = %employee.id, "Login link sent"),
            Err(EmailError::Disabled) => {
                warn!(employee_id = %employee.id, "Login link created but email is disabled")
            }
            Err(e) => warn!(employee_id = %employee.id, error = %e, "Failed to send login link"),
        }

        Ok(())
    }

    /// Email an invite link to a pending employee, revoking older invites.
    pub async fn send_invite(&self, employee: &Employee) -> Result<NotificationResult, AuthError> {
        let tokens = LoginTokenRepository::new(self.pool.clone());
        let revoked = tokens
            .revoke_for_employee(employee.id, LoginTokenPurposeDb::Invite)
            .await?;
        if revoked > 0 {
            debug!(employee_id = %employee.id, revoked, "Revoked previous invite links");
        }

        let token = self
            .issue_token(
                employee.id,
                LoginTokenPurposeDb::Invite,
                Duration::hours(self.invite_ttl_hours),
            )
            .await?;

        let valid_for = format!("{} hours", self.invite_ttl_hours);
        let result = match self
            .email
            .send_magic_link(&employee.email, &employee.name, &token, MagicLinkKind::Invite, &valid_for)
            .await
        {
            Ok(()) => NotificationResult::Sent,
            Err(EmailError::Disabled) => NotificationResult::Skipped,
            Err(e) => {
                warn!(employee_id = %employee.id, error = %e, "Failed to send invite");
                NotificationResult::Failed(e.to_string())
            }
        };

        info!(employee_id = %employee.id, role = %employee.role, "Employee invited");
        Ok(result)
    }

    /// Exchange a link token for a session.
    ///
    /// Pending employees become active on their first successful login.
    pub async fn verify(&self, token: &str) -> Result<SessionResponse, AuthError> {
        let tokens = LoginTokenRepository::new(self.pool.clone());
        let consumed = tokens
            .consume(&sha256_hex(token.trim()))
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let repo = EmployeeRepository::new(self.pool.clone());
        let employee: Employee = repo
            .find_by_id(consumed.employee_id)
            .await?
            .ok_or(AuthError::InvalidToken)?
            .into();

        if employee.status == EmployeeStatus::Inactive {
            info!(employee_id = %employee.id, "Login rejected for inactive employee");
            return Err(AuthError::Inactive);
        }

        let employee: Employee = repo
            .record_login(employee.id, employee.status_after_login().map(Into::into))
            .await?
            .into();

        let (session, _jti) = self.jwt.generate_session_token(employee.id)?;

        info!(
            employee_id = %employee.id,
            purpose = %consumed.purpose,
            "Staff signed in"
        );

        Ok(SessionResponse {
            token: session,
            token_type: "Bearer",
            expires_in: self.jwt.session_expiry_secs,
            employee,
        })
    }

    async fn issue_token(
        &self,
        employee_id: uuid::Uuid,
        purpose: LoginTokenPurposeDb,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let token = generate_secure_token();
        LoginTokenRepository::new(self.pool.clone())
            .create(employee_id, &sha256_hex(&token), purpose, Utc::now() + ttl)
            .await?;
        Ok(token)
    }
}
