//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use yacht_assistant::MockAnswerService;
use yacht_core::Config;
use yacht_data::MockBackend;
use yacht_web::{AppState, build_app};

pub mod fixtures;

pub use fixtures::*;

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Application over mock services, driven in-process
pub struct TestApp {
    pub state: Arc<AppState>,
    pub backend: Arc<MockBackend>,
    pub answers: Arc<MockAnswerService>,
    router: Router,
}

impl TestApp {
    /// Demo backend and instant canned answers
    pub fn demo() -> Self {
        Self::new(MockBackend::demo(), MockAnswerService::demo().with_delay(0))
    }

    /// Explicit mock services
    pub fn new(backend: MockBackend, answers: MockAnswerService) -> Self {
        Self::from_state(backend, answers, |state| state)
    }

    /// Explicit mock services with extra state wiring
    pub fn from_state(
        backend: MockBackend,
        answers: MockAnswerService,
        wire: impl FnOnce(AppState) -> AppState,
    ) -> Self {
        init_test_logging();
        let backend = Arc::new(backend);
        let answers = Arc::new(answers);
        let state = Arc::new(wire(AppState::with_services(
            Config::default(),
            backend.clone(),
            answers.clone(),
        )));
        Self {
            router: build_app(state.clone()),
            state,
            backend,
            answers,
        }
    }

    /// GET a JSON endpoint
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// POST to a JSON endpoint, with an optional JSON body
    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::post(uri).body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Serve the application on an ephemeral local port
    pub async fn serve(&self) -> (SocketAddr, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(self.state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, handle)
    }
}
