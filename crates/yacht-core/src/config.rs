//! Configuration management for the yacht analytics dashboard

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Web server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Backend database RPC configuration
    #[validate(nested)]
    pub backend: BackendConfig,

    /// Conversational answer service configuration
    #[validate(nested)]
    pub assistant: AssistantConfig,

    /// Voice SDK configuration
    #[validate(nested)]
    pub voice: VoiceConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
}

/// Backend (managed database) configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BackendConfig {
    /// Base URL of the backend project, e.g. `https://xyz.supabase.co`
    #[serde(default = "default_backend_url")]
    #[validate(url)]
    pub url: String,

    /// Anonymous API key sent with every RPC
    #[serde(default)]
    pub anon_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

/// Conversational answer service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssistantConfig {
    /// Base URL of the chat API (the service exposing `POST /api/chat`)
    #[serde(default = "default_chat_api_url")]
    #[validate(url)]
    pub chat_api_url: String,

    /// Number of trailing turns sent as conversation history
    #[serde(default = "default_history_window")]
    #[validate(range(min = 1))]
    pub history_window: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_chat_timeout")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,
}

/// Voice SDK configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct VoiceConfig {
    /// WebSocket endpoint of the voice gateway
    #[serde(default)]
    #[validate(url)]
    pub ws_url: Option<String>,

    /// Public API key for the voice SDK
    #[serde(default)]
    pub api_key: Option<String>,

    /// Hosted assistant identifier passed to `start`
    #[serde(default)]
    pub assistant_id: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3001
}

fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_chat_api_url() -> String {
    "http://localhost:8000".to_string()
}

const fn default_history_window() -> usize {
    6
}

const fn default_chat_timeout() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("SUPABASE_URL").unwrap_or_else(|_| default_backend_url()),
            anon_key: std::env::var("SUPABASE_KEY").unwrap_or_default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            chat_api_url: std::env::var("YACHT_CHAT_API_URL")
                .unwrap_or_else(|_| default_chat_api_url()),
            history_window: default_history_window(),
            request_timeout_secs: default_chat_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            backend: BackendConfig::default(),
            assistant: AssistantConfig::default(),
            voice: VoiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `config.*` in the working directory and the
    /// `YACHT_` environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (or `config.*` when `None`)
    /// layered under the `YACHT_` environment.
    ///
    /// Nested keys use a double underscore: `YACHT_SERVER__PORT=8080`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("YACHT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.check()?;
        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Validate field constraints
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` naming the first offending field.
    pub fn check(&self) -> crate::Result<()> {
        self.validate().map_err(|errors| {
            let field = errors
                .errors()
                .keys()
                .next()
                .map_or_else(|| "config".to_string(), ToString::to_string);
            crate::Error::Validation {
                field,
                message: errors.to_string(),
            }
        })
    }
}
