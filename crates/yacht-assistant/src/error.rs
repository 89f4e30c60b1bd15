//! Error types for the assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Errors raised by the answer service, the chat flow and the voice panel
#[derive(Error, Debug)]
pub enum AssistantError {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The answer service replied with a non-success status
    #[error("API Error: {status}")]
    ServiceStatus {
        /// HTTP status code
        status: u16,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Submission with no text
    #[error("Question is empty")]
    EmptyQuestion,

    /// Submission while the previous one is still awaiting its reply
    #[error("A reply is still pending")]
    ReplyPending,

    /// Unknown chat session
    #[error("Chat session not found: {id}")]
    SessionNotFound {
        /// Session id
        id: String,
    },

    /// `start` on a panel that already owns a live call
    #[error("Voice call already active")]
    VoiceAlreadyActive,

    /// Call control on a panel with no live call
    #[error("No active voice call")]
    VoiceNotActive,

    /// Voice SDK transport failure
    #[error("Voice transport error: {message}")]
    VoiceTransport {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl AssistantError {
    /// Create a voice transport error
    pub fn voice(message: impl Into<String>) -> Self {
        Self::VoiceTransport {
            message: message.into(),
        }
    }

    /// Text shown inline in the conversation
    pub fn user_message(&self) -> String {
        match self {
            Self::ServiceStatus { .. } | Self::EmptyQuestion | Self::ReplyPending => {
                self.to_string()
            }
            Self::Http(err) if err.is_timeout() => "The assistant took too long to answer".to_string(),
            Self::Http(_) | Self::Json(_) => "Failed to get response".to_string(),
            Self::SessionNotFound { .. } => "This conversation no longer exists".to_string(),
            Self::VoiceAlreadyActive | Self::VoiceNotActive | Self::VoiceTransport { .. } => {
                "Voice call failed. Please try again.".to_string()
            }
            Self::Configuration { .. } => "The assistant is not configured".to_string(),
        }
    }

    /// True for errors worth a retry by the user
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::ServiceStatus { .. } | Self::VoiceTransport { .. }
        )
    }
}
