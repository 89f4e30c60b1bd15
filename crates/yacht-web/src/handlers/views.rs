//! View endpoints: dashboard, analytics, conversations and call detail

use super::{ApiError, ErrorResponse};
use crate::state::AppState;
use crate::view_state::{ViewState, ViewStatus};
use crate::views::{
    analytics::{self, AnalyticsPage},
    call_detail::{self, CallDetailPage},
    conversations::{self, ConversationFilter, ConversationsPage},
    dashboard::{self, DashboardPage},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Snapshot options
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotQuery {
    /// Wait for the in-flight batch to settle before rendering
    pub wait: bool,
}

/// Refresh outcome
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse<P> {
    /// Whether a new batch started
    pub started: bool,
    /// Snapshot right after the request
    pub page: P,
}

async fn snapshot<T>(view: &ViewState<T>, query: SnapshotQuery) -> ViewStatus<T>
where
    T: Clone + Send + Sync + 'static,
{
    if query.wait {
        view.settled().await
    } else {
        view.status()
    }
}

/// Dashboard home
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> Json<DashboardPage> {
    let backend = state.backend.clone();
    if state.dashboard.activate(move || dashboard::fetch(backend)) {
        debug!("dashboard activated");
    }
    Json(dashboard::render(&snapshot(&state.dashboard, query).await))
}

/// Refetch the dashboard batch
pub async fn refresh_dashboard(
    State(state): State<Arc<AppState>>,
) -> Json<RefreshResponse<DashboardPage>> {
    let backend = state.backend.clone();
    let started = state.dashboard.refresh(move || dashboard::fetch(backend));
    info!(started, "dashboard refresh requested");
    Json(RefreshResponse {
        started,
        page: dashboard::render(&state.dashboard.status()),
    })
}

/// Analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> Json<AnalyticsPage> {
    let backend = state.backend.clone();
    state.analytics.activate(move || analytics::fetch(backend));
    Json(analytics::render(&snapshot(&state.analytics, query).await))
}

/// Refetch the analytics batch
pub async fn refresh_analytics(
    State(state): State<Arc<AppState>>,
) -> Json<RefreshResponse<AnalyticsPage>> {
    let backend = state.backend.clone();
    let started = state.analytics.refresh(move || analytics::fetch(backend));
    info!(started, "analytics refresh requested");
    Json(RefreshResponse {
        started,
        page: analytics::render(&state.analytics.status()),
    })
}

/// Conversations list, filtered by the query string
pub async fn get_conversations(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ConversationFilter>,
    Query(query): Query<SnapshotQuery>,
) -> Json<ConversationsPage> {
    let backend = state.backend.clone();
    state
        .conversations
        .activate(move || conversations::fetch(backend));
    Json(conversations::render(
        &snapshot(&state.conversations, query).await,
        filter,
    ))
}

/// Refetch the conversations list
pub async fn refresh_conversations(
    State(state): State<Arc<AppState>>,
) -> Json<RefreshResponse<ConversationsPage>> {
    let backend = state.backend.clone();
    let started = state
        .conversations
        .refresh(move || conversations::fetch(backend));
    info!(started, "conversations refresh requested");
    Json(RefreshResponse {
        started,
        page: conversations::render(&state.conversations.status(), ConversationFilter::default()),
    })
}

/// One call.
///
/// Answers 404 when the call does not exist and 502 when the backend
/// failed; the body is the rendered page either way.
pub async fn get_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> Result<Json<CallDetailPage>, (StatusCode, Json<CallDetailPage>)> {
    let page = call_detail::load(state.backend.clone(), &call_id).await;
    if page.is_not_found() {
        Err((StatusCode::NOT_FOUND, Json(page)))
    } else if page.error.is_some() {
        Err((StatusCode::BAD_GATEWAY, Json(page)))
    } else {
        Ok(Json(page))
    }
}

/// Unknown route
pub async fn not_found() -> ApiError {
    ErrorResponse::new(
        StatusCode::NOT_FOUND,
        "ROUTE_NOT_FOUND",
        "The requested endpoint does not exist",
    )
}
