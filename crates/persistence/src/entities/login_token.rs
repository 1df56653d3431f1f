//! Login token entity (magic link tokens).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Why a login token was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "login_token_purpose", rename_all = "lowercase")]
pub enum LoginTokenPurposeDb {
    Invite,
    Login,
}

impl std::fmt::Display for LoginTokenPurposeDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invite => write!(f, "invite"),
            Self::Login => write!(f, "login"),
        }
    }
}

/// Database row mapping for the login_tokens table.
///
/// Only the SHA-256 hash of the emailed token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct LoginTokenEntity {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub token_hash: String,
    pub purpose: LoginTokenPurposeDb,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
