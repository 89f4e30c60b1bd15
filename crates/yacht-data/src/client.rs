//! Backend RPC client

use crate::models::RawRow;
use crate::queries::Procedure;
use async_trait::async_trait;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use yacht_core::{Error, Result, config::BackendConfig};

/// Remote procedure surface of the analytics backend.
///
/// Views receive an `Arc<dyn Backend>` rather than reaching for a global
/// client, so tests can substitute [`crate::mock::MockBackend`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Invoke a procedure and split its response into raw rows
    async fn rpc(&self, procedure: Procedure, params: Value) -> Result<Vec<RawRow>>;
}

/// PostgREST client for a Supabase project
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("anon_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| Error::Http(format!("Failed to build backend client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        })
    }

    fn rpc_url(&self, procedure: Procedure) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, procedure.name())
    }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn rpc(&self, procedure: Procedure, params: Value) -> Result<Vec<RawRow>> {
        let started = Instant::now();
        debug!(%procedure, "issuing backend rpc");

        let mut request = self.client.post(self.rpc_url(procedure)).json(&params);
        if !self.anon_key.is_empty() {
            request = request
                .header("apikey", &self.anon_key)
                .bearer_auth(&self.anon_key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%procedure, error = %e, "backend rpc failed to send");
            Error::backend(procedure.name(), format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%procedure, %status, "backend rpc returned error status");
            return Err(Error::backend(
                procedure.name(),
                format!("HTTP {status}: {body}"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::backend(procedure.name(), format!("failed to read body: {e}")))?;

        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&body)?
        };

        let rows = RawRow::rows_from_response(value);
        debug!(
            %procedure,
            rows = rows.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "backend rpc settled"
        );
        Ok(rows)
    }
}
