//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod employee;
pub mod login_token;
pub mod reservation;
pub mod settings;
pub mod table;

pub use employee::{EmployeeEntity, EmployeeRoleDb, EmployeeStatusDb};
pub use login_token::{LoginTokenEntity, LoginTokenPurposeDb};
pub use reservation::{ReservationEntity, ReservationStatsRow, ReservationStatusDb};
pub use settings::SettingsEntity;
pub use table::{TableEntity, TableStatusCount, TableStatusDb};
