//! Conversational assistant for the yacht analytics dashboard
//!
//! Wraps the external answer service behind [`AnswerService`], drives the
//! chat conversation state machine, and owns the voice panel's SDK
//! connection.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools
)]

pub mod chat;
pub mod error;
pub mod http;
pub mod mock;
pub mod service;
pub mod types;
pub mod voice;
pub mod websocket;

pub use chat::{ChatFlow, ChatPhase, ChatSession, ChatSessions};
pub use error::{AssistantError, AssistantResult};
pub use http::HttpAnswerService;
pub use mock::{MockAnswerService, MockVoiceHandle, MockVoiceTransport};
pub use service::AnswerService;
pub use types::{ChatRequest, HistoryEntry, ParsedAnswer, RawAnswer, parse_answer_payload};
pub use voice::{VoiceEvent, VoiceIndicators, VoiceMessage, VoicePanel, VoiceTransport};
pub use websocket::WsVoiceTransport;
