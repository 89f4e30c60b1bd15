//! HTTP answer service client

use crate::error::{AssistantError, AssistantResult};
use crate::service::AnswerService;
use crate::types::{ChatRequest, RawAnswer};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use yacht_core::config::AssistantConfig;

/// Client for the external chat API
#[derive(Debug, Clone)]
pub struct HttpAnswerService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnswerService {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be built.
    pub fn new(config: &AssistantConfig) -> AssistantResult<Self> {
        let base_url = config.chat_api_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AssistantError::Configuration {
                message: "assistant.chat_api_url is empty".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: &ChatRequest) -> AssistantResult<RawAnswer> {
        info!(
            history = request.conversation_history.len(),
            "sending question to answer service"
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "answer service returned error status");
            return Err(AssistantError::ServiceStatus {
                status: status.as_u16(),
            });
        }

        let answer: RawAnswer = response.json().await?;
        debug!(chars = answer.answer.len(), "answer received");
        Ok(answer)
    }

    async fn health_check(&self) -> AssistantResult<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AssistantError::ServiceStatus {
                status: response.status().as_u16(),
            })
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
