//! Headless watcher: polls followed streams and relays notifications,
//! page opens and sounds to the browser front-end over WebSocket.

use tracing_subscriber::EnvFilter;

use live_watcher_lib::app::SharedState;
use live_watcher_lib::shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting live watcher");

    let (db, config, dir) = live_watcher_lib::init_foundation()?;
    let state = SharedState::new(db, config, dir);

    if let Err(e) = state.engine().suspend_controller().reset().await {
        tracing::warn!("Failed to reset suspend state: {e}");
    }

    let server_handle = live_watcher_lib::spawn_background_tasks(&state);
    state.engine().run().await;

    tracing::info!(
        port = state.server_port(),
        "Watcher running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    shutdown::graceful_shutdown(&state).await;
    if let Err(e) = server_handle.await {
        tracing::warn!("Server task ended abnormally: {e}");
    }
    Ok(())
}
