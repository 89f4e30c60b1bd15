//! Application state management

use crate::views::{analytics::AnalyticsData, dashboard::DashboardData};
use crate::view_state::ViewState;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use yacht_assistant::{
    AnswerService, ChatSessions, HttpAnswerService, MockAnswerService, VoiceTransport,
    WsVoiceTransport,
};
use yacht_core::{CallRecord, Config, Error, Result};
use yacht_data::{Backend, MockBackend, SupabaseClient};

/// Builds a fresh voice SDK connection per voice panel
pub type VoiceFactory = Arc<dyn Fn() -> Box<dyn VoiceTransport> + Send + Sync>;

/// Voice gateway wiring
#[derive(Clone)]
pub struct VoiceSetup {
    /// Hosted assistant passed to `start`
    pub assistant_id: String,
    /// Transport factory
    pub factory: VoiceFactory,
}

impl fmt::Debug for VoiceSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceSetup")
            .field("assistant_id", &self.assistant_id)
            .finish_non_exhaustive()
    }
}

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Backend procedure client
    pub backend: Arc<dyn Backend>,
    /// Conversational answer service
    pub answers: Arc<dyn AnswerService>,
    /// Dashboard home view
    pub dashboard: ViewState<DashboardData>,
    /// Analytics view
    pub analytics: ViewState<AnalyticsData>,
    /// Conversations list view
    pub conversations: ViewState<Vec<CallRecord>>,
    /// Chat sessions of the assistant view
    pub chat: Mutex<ChatSessions>,
    /// Voice gateway, when configured
    pub voice: Option<VoiceSetup>,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("dashboard", &self.dashboard.status().name())
            .field("analytics", &self.analytics.status().name())
            .field("conversations", &self.conversations.status().name())
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State wired to the configured backend, answer service and voice
    /// gateway
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let backend = Arc::new(SupabaseClient::new(&config.backend)?);
        let answers = Arc::new(HttpAnswerService::new(&config.assistant).map_err(|e| {
            Error::Configuration {
                message: e.to_string(),
            }
        })?);
        let voice = voice_from_config(&config);

        Ok(Self::with_services(config, backend, answers).with_voice(voice))
    }

    /// State over the in-memory sample backend and canned assistant
    pub fn demo(config: Config) -> Self {
        info!("using in-memory demo services");
        Self::with_services(
            config,
            Arc::new(MockBackend::demo()),
            Arc::new(MockAnswerService::demo()),
        )
    }

    /// State over explicit services, voice disabled
    pub fn with_services(
        config: Config,
        backend: Arc<dyn Backend>,
        answers: Arc<dyn AnswerService>,
    ) -> Self {
        let chat = ChatSessions::new(config.assistant.history_window);
        Self {
            config,
            backend,
            answers,
            dashboard: ViewState::new("dashboard"),
            analytics: ViewState::new("analytics"),
            conversations: ViewState::new("conversations"),
            chat: Mutex::new(chat),
            voice: None,
            started_at: Instant::now(),
        }
    }

    /// Replace the voice gateway wiring
    #[must_use]
    pub fn with_voice(mut self, voice: Option<VoiceSetup>) -> Self {
        self.voice = voice;
        self
    }

    /// Seconds since the state was built
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

fn voice_from_config(config: &Config) -> Option<VoiceSetup> {
    let url = config.voice.ws_url.clone()?;
    let api_key = config.voice.api_key.clone();
    info!(%url, "voice gateway configured");

    Some(VoiceSetup {
        assistant_id: config.voice.assistant_id.clone().unwrap_or_default(),
        factory: Arc::new(move || {
            Box::new(WsVoiceTransport::new(url.clone(), api_key.clone())) as Box<dyn VoiceTransport>
        }),
    })
}
