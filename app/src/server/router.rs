use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

use super::{api, websocket};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        // --- Account ---
        .route("/api/connect", post(api::auth::connect))
        .route("/callback", get(api::auth::callback))
        // --- Listings ---
        .route("/api/streams/following", get(api::streams::following_streams))
        .route("/api/streams", get(api::streams::streams))
        .route("/api/streamers/following", get(api::streams::following_streamers))
        .route(
            "/api/trending-languages",
            get(api::trending::get_trending_languages).put(api::trending::set_trending_languages),
        )
        // --- Auto-open ---
        .route("/api/suspend", get(api::suspend::get_suspend).put(api::suspend::set_suspend))
        .route("/api/auto-open", get(api::auto_open::list))
        .route(
            "/api/auto-open/{user_id}",
            get(api::auto_open::get_member)
                .put(api::auto_open::enable)
                .delete(api::auto_open::disable),
        )
        // --- Preferences ---
        .route(
            "/api/preferences",
            get(api::preferences::get_preferences).put(api::preferences::update_preferences),
        )
        .route("/api/sound/test", post(api::sound::play_test_sound))
        .route("/api/settings", get(api::settings::get_settings).put(api::settings::update_settings))
        // --- Front-end bridge ---
        .route("/api/notifications/{id}/click", post(api::notifications::click))
        .route("/api/pages", put(api::pages::report_pages))
        .route("/api/badge", put(api::badge::set_badge))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
