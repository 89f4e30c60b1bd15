//! Assistant chat endpoints

use super::{ApiError, ErrorResponse, assistant_error};
use crate::state::AppState;
use crate::views::assistant::{
    ConversationPage, SessionsPage, render_conversation, render_sessions,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{Instrument, error, info, instrument};

/// New message body
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    /// Question text
    pub content: String,
}

/// Session list
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<SessionsPage> {
    let chat = state.chat.lock();
    Json(render_sessions(&chat, &chrono::Utc::now()))
}

/// Start a new chat and make it current
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ConversationPage>), ApiError> {
    let mut chat = state.chat.lock();
    let session = chat.start_new();
    let page = render_conversation(&chat, &session.id).map_err(|e| assistant_error(&e))?;
    Ok((StatusCode::CREATED, Json(page)))
}

/// One conversation
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ConversationPage>, ApiError> {
    let chat = state.chat.lock();
    render_conversation(&chat, &id)
        .map(Json)
        .map_err(|e| assistant_error(&e))
}

/// Switch the current session
pub async fn select_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionsPage>, ApiError> {
    let mut chat = state.chat.lock();
    chat.select(&id).map_err(|e| assistant_error(&e))?;
    Ok(Json(render_sessions(&chat, &chrono::Utc::now())))
}

/// Ask a question in a session.
///
/// The session lock is released while the answer service works, so other
/// sessions stay usable; this one reports `ReplyPending` until the reply
/// settles. The exchange runs in its own task and settles even if the
/// client goes away. A failed reply is rendered inline with status 200.
#[instrument(skip(state, body), fields(session = %id))]
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<ConversationPage>, ApiError> {
    let request = {
        let mut chat = state.chat.lock();
        let flow = chat.flow_mut(&id).map_err(|e| assistant_error(&e))?;
        let request = flow.submit(&body.content).map_err(|e| assistant_error(&e))?;
        flow.mark_awaiting();
        request
    };

    let exchange = tokio::spawn(
        {
            let state = Arc::clone(&state);
            let id = id.clone();
            async move {
                let outcome = state.answers.ask(&request).await;
                let mut chat = state.chat.lock();
                chat.settle(&id, &request.question, outcome)
            }
        }
        .in_current_span(),
    );

    let phase = exchange
        .await
        .map_err(|e| {
            error!(error = %e, "chat exchange task failed");
            ErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CHAT_EXCHANGE_FAILED",
                "The assistant request did not complete",
            )
        })?
        .map_err(|e| assistant_error(&e))?;
    info!(?phase, "chat exchange settled");

    let chat = state.chat.lock();
    render_conversation(&chat, &id)
        .map(Json)
        .map_err(|e| assistant_error(&e))
}
