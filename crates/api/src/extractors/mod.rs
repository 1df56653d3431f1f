//! Custom Axum extractors.

pub mod staff;
