//! # campus-server
//!
//! Axum HTTP boundary for the campus records store.
//!
//! - JSON endpoints for colleges, students, events, registrations,
//!   attendance, feedback, reports and the demo seed
//! - [`ApiError`] maps store errors to status codes and `{"error": ...}` bodies
//! - `/health` pings the database
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use errors::ApiError;
pub use server::{AppState, CampusServer};
pub use shutdown::ShutdownCoordinator;
