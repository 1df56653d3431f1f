//! HTTP route handlers.

pub mod auth;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod notifications;
pub mod reservations;
pub mod settings;
pub mod stats;
pub mod tables;
