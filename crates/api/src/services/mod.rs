//! Application services.

pub mod admin_bootstrap;
pub mod auth;
pub mod email;
pub mod reservations;

pub use auth::{AuthError, AuthService, SessionResponse};
pub use email::{EmailError, EmailService};
pub use reservations::{ActionOutcome, ReservationService, ReservationServiceError};
