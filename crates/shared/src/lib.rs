//! Shared utilities and common types for the reservation backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (hashing, login token generation)
//! - Staff session tokens (JWT)
//! - `HH:MM` time-of-day serialization helpers
//! - Common validation logic

pub mod crypto;
pub mod jwt;
pub mod time_format;
pub mod validation;
