//! Shared HTTP infrastructure for the booking platform: listener config,
//! the JSON error envelope, observability setup and common middleware.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
