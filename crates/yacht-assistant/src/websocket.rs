//! WebSocket transport for the voice SDK
//!
//! Commands go out as JSON text frames (`start`, `stop`, `mute`). Incoming
//! text frames are decoded as [`VoiceEvent`]s by a reader task and queued
//! for [`VoiceTransport::next_event`].

use crate::error::{AssistantError, AssistantResult};
use crate::voice::{VoiceEvent, VoiceTransport};
use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::AUTHORIZATION};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use yacht_core::config::VoiceConfig;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

const EVENT_BUFFER: usize = 64;

/// Voice SDK connection over a WebSocket
#[derive(Debug)]
pub struct WsVoiceTransport {
    url: String,
    api_key: Option<String>,
    sink: Option<WsSink>,
    events: Option<mpsc::Receiver<VoiceEvent>>,
    reader: Option<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl WsVoiceTransport {
    /// Create an unconnected transport
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
            sink: None,
            events: None,
            reader: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a transport from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no voice endpoint is configured.
    pub fn from_config(config: &VoiceConfig) -> AssistantResult<Self> {
        let url = config
            .ws_url
            .clone()
            .ok_or_else(|| AssistantError::Configuration {
                message: "voice.ws_url is not set".to_string(),
            })?;
        Ok(Self::new(url, config.api_key.clone()))
    }

    async fn send_command(&mut self, command: serde_json::Value) -> AssistantResult<()> {
        let sink = self.sink.as_mut().ok_or(AssistantError::VoiceNotActive)?;
        sink.send(Message::Text(command.to_string()))
            .await
            .map_err(|e| AssistantError::voice(format!("send failed: {e}")))
    }

    fn connect_url(&self, assistant_id: &str) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}assistant_id={}",
            self.url,
            urlencoding::encode(assistant_id)
        )
    }
}

#[async_trait]
impl VoiceTransport for WsVoiceTransport {
    async fn start(&mut self, assistant_id: &str) -> AssistantResult<()> {
        if self.sink.is_some() {
            return Err(AssistantError::VoiceAlreadyActive);
        }

        let url = self.connect_url(assistant_id);
        info!("Connecting to voice WebSocket at {}", self.url);

        let mut request = url
            .into_client_request()
            .map_err(|e| AssistantError::voice(format!("invalid voice URL: {e}")))?;
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| AssistantError::voice(format!("invalid API key: {e}")))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (ws_stream, _) = connect_async(request)
            .await
            .map_err(|e| AssistantError::voice(format!("WebSocket connection failed: {e}")))?;
        let (sink, mut stream) = ws_stream.split();

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        self.cancel = CancellationToken::new();
        let cancel = self.cancel.clone();

        let reader = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    frame = stream.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<VoiceEvent>(&text) {
                                Ok(event) => {
                                    if tx.send(event).await.is_err() {
                                        break;
                                    }
                                }
                                Err(e) => warn!(error = %e, "Failed to parse voice event"),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Voice WebSocket closed");
                            let _ = tx.send(VoiceEvent::CallEnd).await;
                            break;
                        }
                        Some(Err(e)) => {
                            error!("Voice WebSocket error: {}", e);
                            let _ = tx
                                .send(VoiceEvent::Error { error: e.to_string() })
                                .await;
                            break;
                        }
                        Some(Ok(_)) => {}
                    },
                }
            }
        });

        self.sink = Some(sink);
        self.events = Some(rx);
        self.reader = Some(reader);

        let started = self
            .send_command(json!({"type": "start", "assistantId": assistant_id}))
            .await;
        if let Err(e) = &started {
            warn!(error = %e, "voice start command failed, closing connection");
            self.shutdown();
        }
        started
    }

    async fn stop(&mut self) -> AssistantResult<()> {
        let result = self.send_command(json!({"type": "stop"})).await;
        if let Some(mut sink) = self.sink.take() {
            if let Err(e) = sink.close().await {
                warn!(error = %e, "voice WebSocket close failed");
            }
        }
        self.shutdown();
        result
    }

    async fn set_muted(&mut self, muted: bool) -> AssistantResult<()> {
        self.send_command(json!({"type": "mute", "muted": muted}))
            .await
    }

    async fn next_event(&mut self) -> Option<VoiceEvent> {
        self.events.as_mut()?.recv().await
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.sink = None;
        self.events = None;
    }
}

impl Drop for WsVoiceTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}
