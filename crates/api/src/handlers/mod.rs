//! API handlers for all routes
//!
//! This module contains the HTTP handlers for all API endpoints.
//! Currently implementing basic placeholder handlers to make the system functional.

pub mod auth;
pub mod users;
pub mod roles;
pub mod customers;
pub mod catalog_sync;