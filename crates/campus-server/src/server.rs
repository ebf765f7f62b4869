//! `CampusServer` — Axum HTTP server over a [`CampusStore`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use campus_store::CampusStore;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::handlers::{entities, facts, reports};
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The records store.
    pub store: CampusStore,
    /// When the server started.
    pub start_time: Instant,
}

/// The campus records HTTP server.
pub struct CampusServer {
    config: ServerConfig,
    store: CampusStore,
    shutdown: Arc<ShutdownCoordinator>,
    start_time: Instant,
}

impl CampusServer {
    /// Create a new server.
    pub fn new(config: ServerConfig, store: CampusStore) -> Self {
        Self {
            config,
            store,
            shutdown: Arc::new(ShutdownCoordinator::new()),
            start_time: Instant::now(),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        let state = AppState {
            store: self.store.clone(),
            start_time: self.start_time,
        };

        Router::new()
            .route("/health", get(health_handler))
            .route("/colleges", post(entities::create_college))
            .route("/students", post(entities::create_student))
            .route("/students/{id}", get(entities::get_student))
            .route("/events", post(entities::create_event))
            .route("/events/{id}", get(entities::get_event))
            .route("/register", post(facts::register))
            .route("/attendance", post(facts::mark_attendance))
            .route("/feedback", post(facts::submit_feedback))
            .route("/reports/registrations", get(reports::registrations))
            .route("/reports/attendance", get(reports::attendance))
            .route("/reports/feedback", get(reports::feedback))
            .route("/reports/top-students", get(reports::top_students))
            .route("/reports/events", get(reports::events_by_type))
            .route("/seed", get(reports::seed))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Bind the configured address and serve until shutdown is requested.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<std::io::Result<()>>)> {
        let listener = tokio::net::TcpListener::bind(self.config.socket_addr()?).await?;
        let addr = listener.local_addr()?;
        let router = self.router();
        let token = self.shutdown.token();

        info!(%addr, "campus server listening");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(token.cancelled_owned())
                .await
        });
        Ok((addr, handle))
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the store.
    pub fn store(&self) -> &CampusStore {
        &self.store
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.store.clone();
    let ping = match tokio::task::spawn_blocking(move || store.ping()).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    let resp = health::health_check(state.start_time, ping);
    let status = if resp.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(resp))
}
