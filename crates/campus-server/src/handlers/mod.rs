//! HTTP handlers, grouped by resource.
//!
//! Handlers parse and validate the request, then hand the store call to the
//! blocking pool via [`run_store`].

pub mod entities;
pub mod facts;
pub mod reports;

use campus_store::CampusStore;

use crate::errors::ApiError;
use crate::server::AppState;

/// Run a store operation on the blocking thread pool.
pub(crate) async fn run_store<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&CampusStore) -> campus_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(ApiError::from)
}
