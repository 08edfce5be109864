//! Library surface of the inference service
//!
//! Exposes the router and configuration so integration tests can
//! drive the real application.

pub mod api;
pub mod config;
