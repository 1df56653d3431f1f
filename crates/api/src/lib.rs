//! HTTP API for the restaurant reservation backend.
//!
//! Exposed as a library so integration tests can build the router against
//! a test database.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod jobs;
pub mod middleware;
pub mod routes;
pub mod services;
