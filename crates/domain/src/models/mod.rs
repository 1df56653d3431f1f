//! Domain models for the reservation backend.

pub mod dashboard;
pub mod employee;
pub mod reservation;
pub mod settings;
pub mod stats;
pub mod table;

pub use dashboard::{DashboardOverview, TableMetrics};
pub use employee::{Employee, EmployeeError, EmployeeRole, EmployeeStatus};
pub use reservation::{BookingError, NewReservation, Reservation, ReservationStatus, TableChange};
pub use settings::{RestaurantSettings, SettingsError};
pub use stats::{compute_stats, ReservationStats, StatsError, StatsRange};
pub use table::{RestaurantTable, TableStatus};
