//! Mock answer service and voice transport for testing and demo mode

use crate::error::{AssistantError, AssistantResult};
use crate::service::AnswerService;
use crate::types::{ChatRequest, RawAnswer};
use crate::voice::{VoiceEvent, VoiceTransport};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};

/// Canned answers keyed by a phrase the question must contain
const DEMO_ANSWERS: &[(&str, &str, &[&str])] = &[
    (
        "frustrated customers",
        "I found 12 customers with negative sentiment this week. The main issues were GPS \
         calibration (5 cases) and engine performance (4 cases).",
        &["c-0002"],
    ),
    (
        "gps issues",
        "GPS-related issues account for 32% of all calls this week. The most common problems \
         are calibration errors (45%), system freezing (30%) and map updates (25%).",
        &["c-0001"],
    ),
    (
        "highest satisfaction",
        "Lisa Kim has the highest customer satisfaction rating at 4.9/5.0 this week, followed \
         by Sarah Johnson at 4.8/5.0.",
        &["c-0003", "c-0001"],
    ),
    (
        "escalated today",
        "15 calls were escalated today, which is 6% of total calls.",
        &["c-0003"],
    ),
    (
        "resolution time",
        "The current average resolution time is 8.7 minutes, an 8% improvement from last week.",
        &[],
    ),
];

const DEMO_FALLBACK: &str = "I'm not sure about that. Could you try rephrasing your question?";

#[derive(Debug, Clone)]
enum Reply {
    Echo,
    Fixed(RawAnswer),
    Failure(u16),
    Demo,
}

/// Mock answer service
///
/// Replies with a plain echo of the question unless configured otherwise.
#[derive(Debug, Clone)]
pub struct MockAnswerService {
    reply: Reply,
    delay_ms: u64,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl Default for MockAnswerService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnswerService {
    /// Create a new mock service
    pub fn new() -> Self {
        Self {
            reply: Reply::Echo,
            delay_ms: 0,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Service answering the dashboard's sample questions
    pub fn demo() -> Self {
        Self {
            reply: Reply::Demo,
            delay_ms: 300,
            ..Self::new()
        }
    }

    /// Always reply with `answer`
    #[must_use]
    pub fn with_reply(mut self, answer: RawAnswer) -> Self {
        self.reply = Reply::Fixed(answer);
        self
    }

    /// Always fail with the given HTTP status
    #[must_use]
    pub fn with_failure(mut self, status: u16) -> Self {
        self.reply = Reply::Failure(status);
        self
    }

    /// Set reply delay for testing
    #[must_use]
    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    fn demo_answer(question: &str) -> RawAnswer {
        let lower = question.to_lowercase();
        let payload = DEMO_ANSWERS
            .iter()
            .find(|(key, _, _)| lower.contains(key))
            .map_or_else(
                || json!({"answer": DEMO_FALLBACK, "sources": [], "confidence": "low"}),
                |(_, answer, calls)| {
                    let sources: Vec<_> = calls.iter().map(|id| json!({"call_id": id})).collect();
                    json!({"answer": answer, "sources": sources, "confidence": "high"})
                },
            );
        RawAnswer::text(payload.to_string())
    }
}

#[async_trait]
impl AnswerService for MockAnswerService {
    async fn ask(&self, request: &ChatRequest) -> AssistantResult<RawAnswer> {
        self.requests.lock().push(request.clone());

        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        match &self.reply {
            Reply::Echo => Ok(RawAnswer::text(format!(
                "Mock answer for: {}",
                request.question
            ))),
            Reply::Fixed(answer) => Ok(answer.clone()),
            Reply::Failure(status) => Err(AssistantError::ServiceStatus { status: *status }),
            Reply::Demo => Ok(Self::demo_answer(&request.question)),
        }
    }

    async fn health_check(&self) -> AssistantResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[derive(Debug, Default)]
struct VoiceLog {
    starts: Vec<String>,
    muted: Option<bool>,
    stops: usize,
    shutdowns: usize,
}

/// In-process voice transport; events are injected through its
/// [`MockVoiceHandle`]
#[derive(Debug)]
pub struct MockVoiceTransport {
    log: Arc<Mutex<VoiceLog>>,
    events: mpsc::UnboundedReceiver<VoiceEvent>,
}

/// Test-side handle of a [`MockVoiceTransport`]
#[derive(Debug, Clone)]
pub struct MockVoiceHandle {
    log: Arc<Mutex<VoiceLog>>,
    events: mpsc::UnboundedSender<VoiceEvent>,
}

impl MockVoiceTransport {
    /// Create a transport and the handle observing it
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, MockVoiceHandle) {
        let log = Arc::new(Mutex::new(VoiceLog::default()));
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                log: Arc::clone(&log),
                events: rx,
            },
            MockVoiceHandle { log, events: tx },
        )
    }
}

#[async_trait]
impl VoiceTransport for MockVoiceTransport {
    async fn start(&mut self, assistant_id: &str) -> AssistantResult<()> {
        self.log.lock().starts.push(assistant_id.to_string());
        Ok(())
    }

    async fn stop(&mut self) -> AssistantResult<()> {
        self.log.lock().stops += 1;
        Ok(())
    }

    async fn set_muted(&mut self, muted: bool) -> AssistantResult<()> {
        self.log.lock().muted = Some(muted);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<VoiceEvent> {
        self.events.recv().await
    }

    fn shutdown(&mut self) {
        self.log.lock().shutdowns += 1;
    }
}

impl MockVoiceHandle {
    /// Assistant ids passed to `start`
    pub fn starts(&self) -> Vec<String> {
        self.log.lock().starts.clone()
    }

    /// Last mute state sent
    pub fn muted(&self) -> Option<bool> {
        self.log.lock().muted
    }

    /// Number of `stop` calls
    pub fn stops(&self) -> usize {
        self.log.lock().stops
    }

    /// Number of `shutdown` calls
    pub fn shutdowns(&self) -> usize {
        self.log.lock().shutdowns
    }

    /// Queue an SDK event for the transport
    pub fn emit(&self, event: VoiceEvent) {
        // The receiver lives as long as the transport; a dropped panel
        // simply discards late events.
        let _ = self.events.send(event);
    }
}
