//! WebSocket bridge between the browser and one voice panel

use super::{ApiError, ErrorResponse};
use crate::state::{AppState, VoiceSetup};
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use yacht_assistant::{VoiceEvent, VoiceIndicators, VoicePanel, VoiceTransport};

/// Command sent by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum VoiceCommand {
    /// Start a call
    Start,
    /// End the call
    Stop,
    /// Toggle the microphone
    Mute,
}

/// Update pushed to the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceUpdate {
    /// SDK event that caused the update, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<VoiceEvent>,
    /// Indicator flags after the update
    pub indicators: VoiceIndicators,
    /// Failure to show next to the controls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Upgrade to the voice bridge; 503 without a voice gateway
pub async fn voice_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let setup = state.voice.clone().ok_or_else(|| {
        ErrorResponse::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "VOICE_DISABLED",
            "Voice assistant is not configured",
        )
    })?;
    Ok(ws.on_upgrade(move |socket| voice_session(socket, setup)))
}

async fn voice_session(socket: WebSocket, setup: VoiceSetup) {
    let (mut sender, mut receiver) = socket.split();
    let mut panel = VoicePanel::new((setup.factory)(), setup.assistant_id);
    info!("voice bridge connected");

    loop {
        let update = tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => apply_command(&mut panel, &text).await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!(error = %e, "voice bridge receive failed");
                    break;
                }
            },
            event = panel.next_event(), if panel.is_active() => VoiceUpdate {
                error: event.is_none().then(|| "Voice connection closed".to_string()),
                event,
                indicators: panel.indicators(),
            },
        };

        let payload = match serde_json::to_string(&update) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "voice update not serializable");
                continue;
            }
        };
        if sender.send(Message::Text(payload)).await.is_err() {
            debug!("voice bridge client gone");
            break;
        }
    }

    drop(panel);
    info!("voice bridge closed");
}

async fn apply_command<T: VoiceTransport>(panel: &mut VoicePanel<T>, text: &str) -> VoiceUpdate {
    let result = match serde_json::from_str::<VoiceCommand>(text) {
        Ok(VoiceCommand::Start) => panel.start().await,
        Ok(VoiceCommand::Stop) => panel.stop().await,
        Ok(VoiceCommand::Mute) => panel.toggle_mute().await.map(|_| ()),
        Err(e) => {
            return VoiceUpdate {
                event: None,
                indicators: panel.indicators(),
                error: Some(format!("Unknown voice command: {e}")),
            };
        }
    };

    VoiceUpdate {
        event: None,
        indicators: panel.indicators(),
        error: result.err().map(|e| e.user_message()),
    }
}
