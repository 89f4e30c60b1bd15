//! Voice assistant panel
//!
//! The panel owns a single voice SDK connection. It is started and stopped
//! by explicit user action and released on drop, whatever path the panel
//! leaves by.

use crate::error::{AssistantError, AssistantResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Lifecycle and message events emitted by the voice SDK
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum VoiceEvent {
    /// The call connected
    CallStart,
    /// The call ended
    CallEnd,
    /// In-call message
    Message {
        /// Message body
        message: VoiceMessage,
    },
    /// SDK-level failure
    Error {
        /// Error description
        #[serde(default)]
        error: String,
    },
}

/// In-call message sub-types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VoiceMessage {
    /// Speech-to-text output for one side of the call
    Transcript {
        /// `user` or `assistant`
        role: String,
        /// `partial` or `final`
        #[serde(rename = "transcriptType", default)]
        transcript_type: String,
        /// Recognised text
        #[serde(default)]
        transcript: String,
    },
    /// Assistant speech started or stopped
    SpeechUpdate {
        /// `started` or `stopped`
        status: String,
        /// Speaker role
        #[serde(default)]
        role: Option<String>,
    },
    /// Tool invocation requested by the remote assistant
    FunctionCall {
        /// Call description, passed through unread
        #[serde(rename = "functionCall", default)]
        function_call: Value,
    },
    /// Any other message type
    #[serde(other)]
    Other,
}

/// Indicator flags shown by the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceIndicators {
    /// SDK connected
    pub connected: bool,
    /// Call in progress
    pub call_active: bool,
    /// Waiting for the user to speak
    pub listening: bool,
    /// Assistant speaking
    pub speaking: bool,
    /// Assistant working on the user's utterance
    pub processing: bool,
    /// Microphone muted
    pub muted: bool,
}

impl VoiceIndicators {
    /// Fold one SDK event into the flags
    pub fn apply(&mut self, event: &VoiceEvent) {
        match event {
            VoiceEvent::CallStart => {
                self.connected = true;
                self.call_active = true;
                self.listening = true;
            }
            VoiceEvent::CallEnd | VoiceEvent::Error { .. } => *self = Self::default(),
            VoiceEvent::Message { message } => self.apply_message(message),
        }
    }

    fn apply_message(&mut self, message: &VoiceMessage) {
        match message {
            VoiceMessage::Transcript {
                role,
                transcript_type,
                ..
            } => match role.as_str() {
                "user" => {
                    self.processing = true;
                    self.listening = false;
                }
                "assistant" if transcript_type == "final" => {
                    self.processing = false;
                    self.speaking = false;
                    self.listening = true;
                }
                "assistant" => {
                    self.processing = false;
                    self.speaking = true;
                }
                _ => {}
            },
            VoiceMessage::SpeechUpdate { status, .. } => match status.as_str() {
                "started" => {
                    self.speaking = true;
                    self.listening = false;
                }
                "stopped" => {
                    self.speaking = false;
                    self.listening = true;
                }
                _ => {}
            },
            VoiceMessage::FunctionCall { function_call } => {
                debug!(%function_call, "voice function call");
            }
            VoiceMessage::Other => {}
        }
    }
}

/// Connection to the voice SDK
#[async_trait]
pub trait VoiceTransport: Send {
    /// Open a call with the given remote assistant
    async fn start(&mut self, assistant_id: &str) -> AssistantResult<()>;

    /// End the call and close the connection
    async fn stop(&mut self) -> AssistantResult<()>;

    /// Mute or unmute the microphone
    async fn set_muted(&mut self, muted: bool) -> AssistantResult<()>;

    /// Next SDK event; `None` once the connection is gone
    async fn next_event(&mut self) -> Option<VoiceEvent>;

    /// Release the connection immediately, without waiting for the remote
    /// side. Called from drop.
    fn shutdown(&mut self);
}

#[async_trait]
impl<T: VoiceTransport + ?Sized> VoiceTransport for Box<T> {
    async fn start(&mut self, assistant_id: &str) -> AssistantResult<()> {
        (**self).start(assistant_id).await
    }

    async fn stop(&mut self) -> AssistantResult<()> {
        (**self).stop().await
    }

    async fn set_muted(&mut self, muted: bool) -> AssistantResult<()> {
        (**self).set_muted(muted).await
    }

    async fn next_event(&mut self) -> Option<VoiceEvent> {
        (**self).next_event().await
    }

    fn shutdown(&mut self) {
        (**self).shutdown();
    }
}

/// Voice panel owning one SDK connection
#[derive(Debug)]
pub struct VoicePanel<T: VoiceTransport> {
    transport: T,
    assistant_id: String,
    active: bool,
    indicators: VoiceIndicators,
}

impl<T: VoiceTransport> VoicePanel<T> {
    /// Panel over a transport, idle until [`Self::start`]
    pub fn new(transport: T, assistant_id: impl Into<String>) -> Self {
        Self {
            transport,
            assistant_id: assistant_id.into(),
            active: false,
            indicators: VoiceIndicators::default(),
        }
    }

    /// Current indicator flags
    pub const fn indicators(&self) -> VoiceIndicators {
        self.indicators
    }

    /// Whether the panel holds a live connection
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start a call
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::VoiceAlreadyActive`] when a call is live,
    /// or the transport's error when the call cannot be opened.
    pub async fn start(&mut self) -> AssistantResult<()> {
        if self.active {
            return Err(AssistantError::VoiceAlreadyActive);
        }
        info!(assistant = %self.assistant_id, "starting voice call");
        self.transport.start(&self.assistant_id).await?;
        self.active = true;
        Ok(())
    }

    /// End the call
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::VoiceNotActive`] when no call is live. A
    /// transport error still leaves the panel idle.
    pub async fn stop(&mut self) -> AssistantResult<()> {
        if !self.active {
            return Err(AssistantError::VoiceNotActive);
        }
        info!("stopping voice call");
        self.active = false;
        self.indicators = VoiceIndicators::default();
        self.transport.stop().await
    }

    /// Flip the mute flag and forward it to the transport
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::VoiceNotActive`] when no call is live, or
    /// the transport's error.
    pub async fn toggle_mute(&mut self) -> AssistantResult<bool> {
        if !self.active {
            return Err(AssistantError::VoiceNotActive);
        }
        let muted = !self.indicators.muted;
        self.transport.set_muted(muted).await?;
        self.indicators.muted = muted;
        Ok(muted)
    }

    /// Wait for the next SDK event and apply it.
    ///
    /// `call-end`, `error` and a vanished connection all leave the panel
    /// idle.
    pub async fn next_event(&mut self) -> Option<VoiceEvent> {
        let Some(event) = self.transport.next_event().await else {
            if self.active {
                warn!("voice connection closed without call-end");
                self.active = false;
                self.indicators = VoiceIndicators::default();
            }
            return None;
        };

        match &event {
            VoiceEvent::CallStart => info!("voice call started"),
            VoiceEvent::CallEnd => {
                info!("voice call ended");
                self.release();
            }
            VoiceEvent::Error { error } => {
                warn!(%error, "voice call error");
                self.release();
            }
            VoiceEvent::Message { message } => debug!(?message, "voice message"),
        }
        self.indicators.apply(&event);
        Some(event)
    }
}

impl<T: VoiceTransport> VoicePanel<T> {
    fn release(&mut self) {
        if self.active {
            self.active = false;
            self.transport.shutdown();
        }
    }
}

impl<T: VoiceTransport> Drop for VoicePanel<T> {
    fn drop(&mut self) {
        if self.active {
            debug!("releasing voice connection on drop");
        }
        self.release();
    }
}
