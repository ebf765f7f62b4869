//! # campusd
//!
//! Campus records server binary: loads settings, initializes logging, opens
//! the database and serves HTTP until Ctrl-C or SIGTERM.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use campus_server::shutdown::DEFAULT_DRAIN_TIMEOUT;
use campus_server::{CampusServer, ServerConfig};
use campus_settings::{CampusSettings, LogFormat};
use campus_store::{CampusStore, ConnectionConfig};
use clap::Parser;

/// Campus records server.
#[derive(Parser, Debug)]
#[command(name = "campusd", about = "Campus event records server", version)]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, 0 for auto-assign (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database file (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Settings file (default `~/.campus/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level or filter directive (overrides settings).
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (overrides settings).
    #[arg(long, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Reject facts that reference unknown students or events.
    #[arg(long)]
    enforce_references: bool,
}

fn parse_log_format(raw: &str) -> std::result::Result<LogFormat, String> {
    campus_settings::loader::parse_log_format(raw)
        .ok_or_else(|| format!("unknown log format {raw:?}, expected compact or json"))
}

impl Cli {
    /// Load settings from the chosen file, then layer the flags on top.
    fn resolve_settings(&self) -> Result<CampusSettings> {
        let path = self
            .settings
            .clone()
            .unwrap_or_else(campus_settings::settings_path);
        let mut settings = campus_settings::load_settings_from_path(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        self.apply(&mut settings);
        Ok(settings)
    }

    fn apply(&self, settings: &mut CampusSettings) {
        if let Some(host) = &self.host {
            settings.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(path) = &self.db_path {
            settings.database.path = path.to_string_lossy().into_owned();
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
        if let Some(format) = self.log_format {
            settings.logging.format = format;
        }
        if self.enforce_references {
            settings.database.enforce_references = true;
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn connection_config(settings: &CampusSettings) -> ConnectionConfig {
    ConnectionConfig {
        pool_size: settings.database.pool_size,
        busy_timeout_ms: settings.database.busy_timeout_ms,
        enforce_references: settings.database.enforce_references,
    }
}

fn server_config(settings: &CampusSettings) -> ServerConfig {
    ServerConfig {
        host: settings.server.host.clone(),
        port: settings.server.port,
    }
}

/// Resolve on Ctrl-C, or on SIGTERM where available.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.context("Failed to listen for ctrl-c")?,
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for ctrl-c")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = args.resolve_settings()?;

    campus_logging::init_subscriber(&settings.logging.level, settings.logging.format);

    let db_path = PathBuf::from(&settings.database.path);
    ensure_parent_dir(&db_path)?;
    let store = CampusStore::open(&db_path.to_string_lossy(), &connection_config(&settings))
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    tracing::info!(
        path = %db_path.display(),
        enforce_references = store.enforces_references(),
        "database ready"
    );

    let server = CampusServer::new(server_config(&settings), store);
    let (addr, mut handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!("campusd listening on http://{addr}");

    tokio::select! {
        res = shutdown_signal() => res?,
        res = &mut handle => {
            // Server stopped without a shutdown request.
            res.context("Server task panicked")?.context("Server failed")?;
            return Ok(());
        }
    }

    tracing::info!("Shutting down...");
    if !server.shutdown().drain(vec![handle], DEFAULT_DRAIN_TIMEOUT).await {
        tracing::warn!("in-flight requests were cut off");
    }
    tracing::info!("Shutdown complete");
    Ok(())
}
