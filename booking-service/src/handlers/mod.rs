//! HTTP handlers for booking-service.

pub mod auth;
pub mod bookings;
pub mod business_account;
pub mod metrics;
pub mod services;
pub mod specialists;
pub mod user_account;
