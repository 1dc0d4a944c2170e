use std::path::PathBuf;

use watch_db::Database;

use crate::app::SharedState;
use crate::background;
use crate::config::{AppConfig, SettingsManager};
use crate::server;

/// Foundation init (fatal on error): .env, data dir, database, settings
/// and the runtime config.
pub fn init_foundation() -> Result<(Database, AppConfig, PathBuf), anyhow::Error> {
    load_dotenv();
    let dir = data_dir();
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("local.db");
    tracing::info!("Opening database at {}", db_path.display());
    let db = Database::open(&db_path)?;

    let sm = SettingsManager::new(db.clone());
    if let Err(e) = sm.migrate_from_env() {
        tracing::error!("Failed to migrate from env: {e}");
    }
    sm.initialize_defaults()?;

    let config = AppConfig::load(&sm)?;

    if let Ok(status) = sm.check_feature_status() {
        if !status.missing_settings.is_empty() {
            tracing::warn!(
                "Missing settings: {:?}, warnings: {:?}",
                status.missing_settings,
                status.warnings
            );
        }
    }

    tracing::info!("Settings loaded (port={})", config.server_port);
    Ok((db, config, dir))
}

/// Start the HTTP server and the message worker (non-fatal).
pub fn spawn_background_tasks(state: &SharedState) -> tokio::task::JoinHandle<()> {
    let s = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(s).await {
            tracing::error!("Server failed: {e}");
        }
    });

    match state.take_message_receiver() {
        Some(rx) => {
            tokio::spawn(background::message_worker_loop(
                state.engine().clone(),
                rx,
                state.shutdown_token().clone(),
            ));
        }
        None => tracing::warn!("Message worker already started"),
    }

    server_handle
}

/// Determine the data directory for the application.
fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LIVE_WATCHER_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".live-watcher")
}

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}
