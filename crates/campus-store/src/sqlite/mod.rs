//! `SQLite` backend for the campus records store.
//!
//! - **[`connection`]**: `r2d2` connection pool with per-connection pragmas.
//! - **[`migrations`]**: version-tracked schema, embedded at compile time.
//! - **[`row_types`]**: row structs for entities, facts and report rows.
//! - **[`repositories`]**: stateless repository structs; each method takes
//!   `&Connection` and executes SQL.

pub mod connection;
pub mod migrations;
pub mod repositories;
pub mod row_types;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, PragmaState, new_file, new_in_memory,
    verify_pragmas,
};
pub use migrations::{current_version, latest_version, run_migrations};
