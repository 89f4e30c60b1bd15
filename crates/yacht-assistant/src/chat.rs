//! Chat flow state machine and chat sessions
//!
//! A submission walks `Composing -> Sent -> AwaitingReply` and settles in
//! `ReplyReceived` or `ReplyFailed`. The user turn is appended at `Sent`,
//! before the service is contacted. A reply appends exactly one assistant
//! turn; a failure appends none and records an inline error instead.
//! Nothing is retried automatically.

use crate::error::{AssistantError, AssistantResult};
use crate::service::AnswerService;
use crate::types::{ChatRequest, HistoryEntry, RawAnswer, parse_answer_payload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use yacht_core::ChatTurn;

/// Default number of prior turns sent as context
pub const DEFAULT_HISTORY_WINDOW: usize = 6;

/// Title given to freshly created sessions
pub const NEW_SESSION_TITLE: &str = "New chat";

/// Where a conversation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    /// Input enabled, nothing in flight
    Composing,
    /// User turn appended, request not yet issued
    Sent,
    /// Request issued
    AwaitingReply,
    /// Last request answered
    ReplyReceived,
    /// Last request failed
    ReplyFailed,
}

impl ChatPhase {
    /// Whether a new submission is accepted
    pub const fn accepts_input(self) -> bool {
        !matches!(self, Self::Sent | Self::AwaitingReply)
    }
}

/// One conversation
#[derive(Debug, Clone)]
pub struct ChatFlow {
    turns: Vec<ChatTurn>,
    phase: ChatPhase,
    error: Option<String>,
    history_window: usize,
}

impl Default for ChatFlow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl ChatFlow {
    /// Empty conversation sending at most `history_window` prior turns
    pub const fn new(history_window: usize) -> Self {
        Self {
            turns: Vec::new(),
            phase: ChatPhase::Composing,
            error: None,
            history_window,
        }
    }

    /// Current phase
    pub const fn phase(&self) -> ChatPhase {
        self.phase
    }

    /// Turns so far, oldest first
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Inline error from the last failed request
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the input box is enabled
    pub const fn input_enabled(&self) -> bool {
        self.phase.accepts_input()
    }

    /// Append the user turn and build the request.
    ///
    /// The context window is taken before the new turn is appended, so it
    /// holds only earlier turns.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::EmptyQuestion`] for blank input and
    /// [`AssistantError::ReplyPending`] while a reply is outstanding.
    pub fn submit(&mut self, content: &str) -> AssistantResult<ChatRequest> {
        if !self.phase.accepts_input() {
            return Err(AssistantError::ReplyPending);
        }
        let question = content.trim();
        if question.is_empty() {
            return Err(AssistantError::EmptyQuestion);
        }

        let skip = self.turns.len().saturating_sub(self.history_window);
        let conversation_history = self.turns[skip..].iter().map(HistoryEntry::from).collect();

        self.turns.push(ChatTurn::user(question));
        self.phase = ChatPhase::Sent;
        self.error = None;

        Ok(ChatRequest {
            question: question.to_string(),
            conversation_history,
        })
    }

    /// Mark the request as issued
    pub fn mark_awaiting(&mut self) {
        if self.phase == ChatPhase::Sent {
            self.phase = ChatPhase::AwaitingReply;
        }
    }

    /// Settle the outstanding request
    pub fn receive(&mut self, outcome: AssistantResult<RawAnswer>) -> ChatPhase {
        match outcome {
            Ok(raw) => {
                let turn = parse_answer_payload(&raw).into_turn();
                info!(sources = turn.sources.len(), "assistant reply received");
                self.turns.push(turn);
                self.phase = ChatPhase::ReplyReceived;
            }
            Err(err) => {
                warn!(error = %err, "assistant request failed");
                self.error = Some(err.user_message());
                self.phase = ChatPhase::ReplyFailed;
            }
        }
        self.phase
    }

    /// Run one full exchange against `service`.
    ///
    /// Service failures settle the flow in [`ChatPhase::ReplyFailed`] and
    /// are not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error only when the submission itself is rejected.
    pub async fn send<S: AnswerService + ?Sized>(
        &mut self,
        service: &S,
        content: &str,
    ) -> AssistantResult<ChatPhase> {
        let request = self.submit(content)?;
        self.mark_awaiting();
        let outcome = service.ask(&request).await;
        Ok(self.receive(outcome))
    }
}

/// Sidebar entry for one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Session id
    pub id: String,
    /// Title shown in the list
    pub title: String,
    /// Last question asked
    pub last_message: String,
    /// Last activity
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    meta: ChatSession,
    flow: ChatFlow,
}

/// All conversations of one assistant view, newest first
#[derive(Debug, Clone)]
pub struct ChatSessions {
    entries: Vec<SessionEntry>,
    current: Option<String>,
    history_window: usize,
}

impl ChatSessions {
    /// No sessions yet
    pub const fn new(history_window: usize) -> Self {
        Self {
            entries: Vec::new(),
            current: None,
            history_window,
        }
    }

    /// Create an empty session at the top of the list and make it current
    pub fn start_new(&mut self) -> ChatSession {
        let meta = ChatSession {
            id: Uuid::new_v4().to_string(),
            title: NEW_SESSION_TITLE.to_string(),
            last_message: String::new(),
            timestamp: Utc::now(),
        };
        info!(session = %meta.id, "chat session started");

        self.entries.insert(
            0,
            SessionEntry {
                meta: meta.clone(),
                flow: ChatFlow::new(self.history_window),
            },
        );
        self.current = Some(meta.id.clone());
        meta
    }

    /// Session list, newest first
    pub fn list(&self) -> Vec<ChatSession> {
        self.entries.iter().map(|entry| entry.meta.clone()).collect()
    }

    /// Id of the current session
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Switch the current session
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::SessionNotFound`] for an unknown id.
    pub fn select(&mut self, id: &str) -> AssistantResult<()> {
        self.entry(id)?;
        self.current = Some(id.to_string());
        Ok(())
    }

    /// Metadata and flow of one session
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::SessionNotFound`] for an unknown id.
    pub fn get(&self, id: &str) -> AssistantResult<(&ChatSession, &ChatFlow)> {
        self.entry(id).map(|entry| (&entry.meta, &entry.flow))
    }

    /// Mutable flow of one session
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::SessionNotFound`] for an unknown id.
    pub fn flow_mut(&mut self, id: &str) -> AssistantResult<&mut ChatFlow> {
        self.entries
            .iter_mut()
            .find(|entry| entry.meta.id == id)
            .map(|entry| &mut entry.flow)
            .ok_or_else(|| AssistantError::SessionNotFound { id: id.to_string() })
    }

    /// Settle a session's outstanding request and, on success, record the
    /// exchange in the session's list entry
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::SessionNotFound`] for an unknown id.
    pub fn settle(
        &mut self,
        id: &str,
        question: &str,
        outcome: AssistantResult<RawAnswer>,
    ) -> AssistantResult<ChatPhase> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.meta.id == id)
            .ok_or_else(|| AssistantError::SessionNotFound { id: id.to_string() })?;

        let phase = entry.flow.receive(outcome);
        if phase == ChatPhase::ReplyReceived {
            entry.meta.last_message = question.to_string();
            entry.meta.timestamp = Utc::now();
        }
        Ok(phase)
    }

    /// Run one full exchange in a session
    ///
    /// # Errors
    ///
    /// Returns an error when the session is unknown or the submission is
    /// rejected. Service failures settle the flow instead.
    pub async fn send<S: AnswerService + ?Sized>(
        &mut self,
        service: &S,
        id: &str,
        content: &str,
    ) -> AssistantResult<ChatPhase> {
        let flow = self.flow_mut(id)?;
        let request = flow.submit(content)?;
        flow.mark_awaiting();
        let outcome = service.ask(&request).await;
        self.settle(id, &request.question, outcome)
    }

    fn entry(&self, id: &str) -> AssistantResult<&SessionEntry> {
        self.entries
            .iter()
            .find(|entry| entry.meta.id == id)
            .ok_or_else(|| AssistantError::SessionNotFound { id: id.to_string() })
    }
}

impl Default for ChatSessions {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}
