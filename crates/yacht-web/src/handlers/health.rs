//! Health check endpoint

use crate::state::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since startup
    pub uptime_seconds: u64,
    /// Status of each long-lived view
    pub views: ViewsHealth,
    /// Whether a voice gateway is configured
    pub voice_enabled: bool,
}

/// Status name of each long-lived view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsHealth {
    /// Dashboard home
    pub dashboard: String,
    /// Analytics
    pub analytics: String,
    /// Conversations list
    pub conversations: String,
}

/// Liveness and view overview.
///
/// Never touches the backend; a failing backend shows up as an `errored`
/// view instead.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        views: ViewsHealth {
            dashboard: state.dashboard.status().name().to_string(),
            analytics: state.analytics.status().name().to_string(),
            conversations: state.conversations.status().name().to_string(),
        },
        voice_enabled: state.voice.is_some(),
    })
}
