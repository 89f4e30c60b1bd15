//! Answer service trait

use crate::error::AssistantResult;
use crate::types::{ChatRequest, RawAnswer};
use async_trait::async_trait;

/// Conversational answer backend
///
/// The service itself (retrieval, language model) lives outside this
/// codebase. Implementations only move requests and replies.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Ask a question with its conversation context
    async fn ask(&self, request: &ChatRequest) -> AssistantResult<RawAnswer>;

    /// Check that the service is reachable
    async fn health_check(&self) -> AssistantResult<()>;

    /// Service name for logs
    fn name(&self) -> &str;
}
