//! Domain layer for the restaurant reservation backend.
//!
//! This crate contains:
//! - Domain models (Reservation, RestaurantTable, Employee, RestaurantSettings)
//! - The reservation lifecycle planner and booking rules
//! - Statistics aggregation
//! - The guest notification trait

pub mod models;
pub mod services;
