//! Route definitions

use crate::{handlers, state::AppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

/// View and chat JSON endpoints
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Views
        .route("/api/dashboard", get(handlers::views::get_dashboard))
        .route(
            "/api/dashboard/refresh",
            post(handlers::views::refresh_dashboard),
        )
        .route("/api/analytics", get(handlers::views::get_analytics))
        .route(
            "/api/analytics/refresh",
            post(handlers::views::refresh_analytics),
        )
        .route(
            "/api/conversations",
            get(handlers::views::get_conversations),
        )
        .route(
            "/api/conversations/refresh",
            post(handlers::views::refresh_conversations),
        )
        .route("/api/calls/:call_id", get(handlers::views::get_call))
        // Assistant
        .route(
            "/api/chat/sessions",
            get(handlers::chat::list_sessions).post(handlers::chat::create_session),
        )
        .route("/api/chat/sessions/:id", get(handlers::chat::get_session))
        .route(
            "/api/chat/sessions/:id/select",
            post(handlers::chat::select_session),
        )
        .route(
            "/api/chat/sessions/:id/messages",
            post(handlers::chat::post_message),
        )
        .route("/api/voice/ws", get(handlers::voice::voice_socket))
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Combine all routes into a single router
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(api_routes())
        .merge(health_routes())
        .fallback(handlers::views::not_found)
}
