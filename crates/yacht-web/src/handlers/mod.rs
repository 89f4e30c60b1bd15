//! HTTP handlers

pub mod chat;
pub mod health;
pub mod views;
pub mod voice;

use axum::{http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use yacht_assistant::AssistantError;

/// Error body shared by every handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Handler error: status plus JSON body
pub type ApiError = (StatusCode, Json<ErrorResponse>);

impl ErrorResponse {
    /// Build an error response with a status
    pub fn new(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
        (
            status,
            Json(Self {
                error: error.into(),
                code: code.to_string(),
                details: None,
            }),
        )
    }
}

/// Map an assistant error onto a status and body
pub fn assistant_error(err: &AssistantError) -> ApiError {
    let (status, code) = match err {
        AssistantError::SessionNotFound { .. } => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
        AssistantError::EmptyQuestion => (StatusCode::BAD_REQUEST, "EMPTY_QUESTION"),
        AssistantError::ReplyPending => (StatusCode::CONFLICT, "REPLY_PENDING"),
        AssistantError::VoiceAlreadyActive | AssistantError::VoiceNotActive => {
            (StatusCode::CONFLICT, "VOICE_STATE")
        }
        AssistantError::Configuration { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED")
        }
        _ => (StatusCode::BAD_GATEWAY, "ASSISTANT_ERROR"),
    };
    ErrorResponse::new(status, code, err.user_message())
}
