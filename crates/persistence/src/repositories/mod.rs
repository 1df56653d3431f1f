//! Repository implementations for database operations.

pub mod employee;
pub mod login_token;
pub mod reservation;
pub mod settings;
pub mod table;

pub use employee::{EmployeeRepository, EmployeeUpdate};
pub use login_token::LoginTokenRepository;
pub use reservation::{ReservationFilter, ReservationRepository};
pub use settings::SettingsRepository;
pub use table::{DeleteTableOutcome, TableRepository};
