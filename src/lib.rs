//! linklet - a small URL shortener with click statistics.
//!
//! The library exposes the service's modules so the binary and the
//! integration tests can both build the router against their own
//! database pool.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;

pub use error::{AppError, AppResult};
