//! Assistant view: chat session list and conversation bubbles

use crate::presentation::{ChatBubble, chat_bubble};
use chrono::{DateTime, Utc};
use serde::Serialize;
use yacht_assistant::{AssistantResult, ChatPhase, ChatSessions};
use yacht_core::utils::relative_time;

/// Example questions offered on an empty conversation
pub const SUGGESTED_QUESTIONS: [&str; 5] = [
    "Show me frustrated customers this week",
    "What are the top GPS issues?",
    "Which agent has the highest satisfaction?",
    "How many calls were escalated today?",
    "What's the average resolution time?",
];

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionItem {
    /// Session id
    pub id: String,
    /// Title
    pub title: String,
    /// Last question asked
    pub last_message: String,
    /// `5m ago`
    pub when: String,
    /// Whether this is the current session
    pub current: bool,
}

/// Session list payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionsPage {
    /// Sessions, newest first
    pub sessions: Vec<SessionItem>,
    /// Example questions
    pub suggestions: Vec<&'static str>,
}

/// One conversation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationPage {
    /// Session id
    pub session_id: String,
    /// Session title
    pub title: String,
    /// Flow phase
    pub phase: ChatPhase,
    /// Whether the input box is enabled
    pub input_enabled: bool,
    /// Inline error from the last failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Bubbles, oldest first
    pub bubbles: Vec<ChatBubble>,
    /// Example questions, only while the conversation is empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<&'static str>,
}

/// Render the session list
pub fn render_sessions(sessions: &ChatSessions, now: &DateTime<Utc>) -> SessionsPage {
    let current = sessions.current();
    SessionsPage {
        sessions: sessions
            .list()
            .into_iter()
            .map(|session| SessionItem {
                current: current == Some(session.id.as_str()),
                when: relative_time(&session.timestamp, now),
                id: session.id,
                title: session.title,
                last_message: session.last_message,
            })
            .collect(),
        suggestions: SUGGESTED_QUESTIONS.to_vec(),
    }
}

/// Render one conversation
///
/// # Errors
///
/// Returns `AssistantError::SessionNotFound` for an unknown id.
pub fn render_conversation(sessions: &ChatSessions, id: &str) -> AssistantResult<ConversationPage> {
    let (meta, flow) = sessions.get(id)?;
    let bubbles: Vec<_> = flow.turns().iter().map(chat_bubble).collect();

    Ok(ConversationPage {
        session_id: meta.id.clone(),
        title: meta.title.clone(),
        phase: flow.phase(),
        input_enabled: flow.input_enabled(),
        error: flow.error().map(str::to_string),
        suggestions: if bubbles.is_empty() {
            SUGGESTED_QUESTIONS.to_vec()
        } else {
            Vec::new()
        },
        bubbles,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use yacht_assistant::{AssistantError, MockAnswerService};

    #[tokio::test]
    async fn test_conversation_after_exchange() {
        let service = MockAnswerService::demo().with_delay(0);
        let mut sessions = ChatSessions::default();
        let session = sessions.start_new();

        let empty = render_conversation(&sessions, &session.id).unwrap();
        assert!(empty.bubbles.is_empty());
        assert_eq!(empty.suggestions.len(), 5);

        sessions
            .send(&service, &session.id, "Which agent has the highest satisfaction?")
            .await
            .unwrap();

        let page = render_conversation(&sessions, &session.id).unwrap();
        assert_eq!(page.phase, ChatPhase::ReplyReceived);
        assert!(page.input_enabled);
        assert_eq!(page.bubbles.len(), 2);
        assert_eq!(page.bubbles[0].role, "user");
        assert_eq!(page.bubbles[1].confidence, Some("high"));
        assert_eq!(page.bubbles[1].sources_label.as_deref(), Some("2 relevant calls"));
        assert!(page.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_failed_exchange_shows_inline_error() {
        let service = MockAnswerService::new().with_failure(500);
        let mut sessions = ChatSessions::default();
        let session = sessions.start_new();
        sessions.send(&service, &session.id, "hi").await.unwrap();

        let page = render_conversation(&sessions, &session.id).unwrap();
        assert_eq!(page.bubbles.len(), 1);
        assert_eq!(page.error.as_deref(), Some("API Error: 500"));
        assert!(page.input_enabled);
    }

    #[test]
    fn test_session_list_marks_current() {
        let mut sessions = ChatSessions::default();
        let older = sessions.start_new();
        let newer = sessions.start_new();

        let page = render_sessions(&sessions, &(Utc::now() + Duration::minutes(5)));
        assert_eq!(page.sessions[0].id, newer.id);
        assert!(page.sessions[0].current);
        assert!(!page.sessions[1].current);
        assert_eq!(page.sessions[1].id, older.id);
        assert_eq!(page.sessions[1].when, "5m ago");
    }

    #[test]
    fn test_unknown_session() {
        let sessions = ChatSessions::default();
        assert!(matches!(
            render_conversation(&sessions, "nope"),
            Err(AssistantError::SessionNotFound { .. })
        ));
    }
}
