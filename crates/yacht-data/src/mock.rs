//! In-memory backend for tests and demo mode

use crate::client::Backend;
use crate::models::RawRow;
use crate::queries::Procedure;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::{Duration, sleep};
use yacht_core::{Error, Result};

/// Canned reply for one procedure
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with this JSON body
    Rows(Value),
    /// Fail with a backend error carrying this message
    Failure(String),
    /// Respond with the elements of this array whose `call_id` matches the
    /// `r_call_id` parameter
    Lookup(Value),
    /// Never respond
    Hang,
}

impl MockResponse {
    /// Successful response
    pub const fn rows(body: Value) -> Self {
        Self::Rows(body)
    }

    /// Failed response
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }
}

/// Mock backend with per-procedure responses and call bookkeeping.
///
/// Procedures without a configured response return no rows. A gate, when
/// installed, holds the reply until the test releases it with
/// [`Notify::notify_one`].
#[derive(Debug, Default)]
pub struct MockBackend {
    responses: Mutex<HashMap<Procedure, MockResponse>>,
    gates: Mutex<HashMap<Procedure, Arc<Notify>>>,
    calls: Mutex<HashMap<Procedure, usize>>,
    params: Mutex<HashMap<Procedure, Value>>,
    delay_ms: u64,
}

impl MockBackend {
    /// Empty mock
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::set_response`]
    #[must_use]
    pub fn with_response(self, procedure: Procedure, response: MockResponse) -> Self {
        self.set_response(procedure, response);
        self
    }

    /// Add a fixed delay before every reply
    #[must_use]
    pub const fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Replace the response for a procedure
    pub fn set_response(&self, procedure: Procedure, response: MockResponse) {
        self.responses.lock().insert(procedure, response);
    }

    /// Install a gate on a procedure and return its release handle
    pub fn gate(&self, procedure: Procedure) -> Arc<Notify> {
        Arc::clone(
            self.gates
                .lock()
                .entry(procedure)
                .or_insert_with(|| Arc::new(Notify::new())),
        )
    }

    /// Number of times a procedure was invoked
    pub fn call_count(&self, procedure: Procedure) -> usize {
        self.calls.lock().get(&procedure).copied().unwrap_or(0)
    }

    /// Total invocations across all procedures
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Parameters of the latest invocation of a procedure
    pub fn last_params(&self, procedure: Procedure) -> Option<Value> {
        self.params.lock().get(&procedure).cloned()
    }

    /// Mock seeded with a week of sample brokerage support data
    pub fn demo() -> Self {
        Self::new()
            .with_response(
                Procedure::CallSummary,
                MockResponse::rows(json!([{
                    "total_calls": 247,
                    "avg_handle_time": 510,
                    "sentiment_score": 4.8,
                    "top_issue": "GPS Issues",
                    "top_issue_count": 45,
                    "busiest_agent": "Sarah Johnson",
                    "total_duration": 125_970,
                    "percent_positive": 72.5
                }])),
            )
            .with_response(
                Procedure::WeekdayCallCounts,
                MockResponse::rows(json!([
                    ["Monday", 180], ["Tuesday", 220], ["Wednesday", 195], ["Thursday", 247],
                    ["Friday", 210], ["Saturday", 165], ["Sunday", 140]
                ])),
            )
            .with_response(
                Procedure::IssueCounts,
                MockResponse::rows(json!([
                    {"f1": "GPS Issues", "f2": 45},
                    {"f1": "Engine Support", "f2": 38},
                    {"f1": "Navigation", "f2": 32},
                    {"f1": "Equipment", "f2": 28},
                    {"f1": "Maintenance", "f2": 24}
                ])),
            )
            .with_response(
                Procedure::IssueDistribution,
                MockResponse::rows(json!([
                    {"name": "GPS Issues", "value": 32},
                    {"name": "Engine Support", "value": 28},
                    {"name": "Navigation", "value": 20},
                    {"name": "Equipment", "value": 12},
                    {"name": "Maintenance", "value": 8}
                ])),
            )
            .with_response(
                Procedure::DailyResolutionStatus,
                MockResponse::rows(json!([
                    ["2024-01-09", 12, 2], ["2024-01-10", 18, 3], ["2024-01-11", 22, 4],
                    ["2024-01-12", 15, 2], ["2024-01-13", 20, 3], ["2024-01-14", 25, 5],
                    ["2024-01-15", 28, 4]
                ])),
            )
            .with_response(
                Procedure::DailySentimentPct,
                MockResponse::rows(json!([
                    ["2024-01-09", 65, 10], ["2024-01-10", 70, 10], ["2024-01-11", 68, 10],
                    ["2024-01-12", 72, 10], ["2024-01-13", 75, 10], ["2024-01-14", 78, 7],
                    ["2024-01-15", 80, 5]
                ])),
            )
            .with_response(
                Procedure::CallCenterMetrics,
                MockResponse::rows(json!({
                    "total_calls": 247,
                    "avg_duration": 510,
                    "resolution_rate": 93.2,
                    "avg_sentiment_score": 4.7,
                    "avg_politeness": 8.9,
                    "avg_professionalism": 8.6,
                    "avg_process_adherence": 8.1
                })),
            )
            .with_response(Procedure::CallData, MockResponse::rows(demo_calls()))
            .with_response(
                Procedure::RecentCall,
                MockResponse::Lookup(demo_calls()),
            )
    }
}

fn demo_calls() -> Value {
    json!([
        {
            "call_id": "c-0001",
            "call_timestamp": "2024-01-15T14:32:00Z",
            "agent_name": "Sarah Johnson",
            "agent_email": "sarah.johnson@yachtsupport.example",
            "customer_name": "Michael Thompson",
            "customer_email": "+1 (555) 123-4567",
            "duration_seconds": 754,
            "issue_type": "GPS Issues",
            "sentiment": "Positive",
            "sentiment_score": 0.82,
            "agent_politeness": 9.1,
            "agent_professionalism": 8.8,
            "process_adherence": 8.4,
            "resolved": true,
            "disposition": "resolved",
            "summary": "Customer had trouble with GPS navigation system. Guided through calibration process.",
            "transcript": "[{\"role\":\"agent\",\"content\":\"Hello, this is Sarah from Yacht Support. How can I help you today?\",\"start_time\":0},{\"role\":\"customer\",\"content\":\"Hi, I'm having issues with my GPS system.\",\"start_time\":4.2}]"
        },
        {
            "call_id": "c-0002",
            "call_timestamp": "2024-01-15T13:45:00Z",
            "agent_name": "Mike Rodriguez",
            "agent_email": "mike.rodriguez@yachtsupport.example",
            "customer_name": "Jennifer Walsh",
            "customer_email": "+1 (555) 987-6543",
            "duration_seconds": 495,
            "issue_type": "Engine Support",
            "sentiment": "Neutral",
            "sentiment_score": 0.1,
            "resolved": false,
            "disposition": "callback",
            "summary": "Engine performance concerns. Scheduled follow-up maintenance appointment.",
            "transcript": "Agent: Good afternoon, this is Mike. What can I assist you with?\nCustomer: I've been noticing some unusual engine sounds..."
        },
        {
            "call_id": "c-0003",
            "call_timestamp": "2024-01-15T12:18:00Z",
            "agent_name": "Lisa Kim",
            "agent_email": "lisa.kim@yachtsupport.example",
            "customer_name": "Robert Chen",
            "customer_email": "+1 (555) 456-7890",
            "duration_seconds": 942,
            "issue_type": "Navigation",
            "sentiment": "Negative",
            "sentiment_score": -0.64,
            "resolved": "false",
            "disposition": "escalated",
            "summary": "Complex navigation system malfunction. Escalated to technical team.",
            "transcript": "Agent: Hello Mr. Chen, this is Lisa. I understand you're having navigation issues?\nCustomer: Yes, the system completely stopped working yesterday..."
        }
    ])
}

#[async_trait]
impl Backend for MockBackend {
    async fn rpc(&self, procedure: Procedure, params: Value) -> Result<Vec<RawRow>> {
        *self.calls.lock().entry(procedure).or_insert(0) += 1;
        self.params.lock().insert(procedure, params);

        let gate = self.gates.lock().get(&procedure).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let response = self.responses.lock().get(&procedure).cloned();
        match response {
            Some(MockResponse::Rows(body)) => Ok(RawRow::rows_from_response(body)),
            Some(MockResponse::Lookup(body)) => {
                let wanted = self
                    .last_params(procedure)
                    .and_then(|params| params.get("r_call_id").cloned());
                let matches = body
                    .as_array()
                    .map(|calls| {
                        calls
                            .iter()
                            .filter(|call| call.get("call_id") == wanted.as_ref())
                            .cloned()
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                Ok(RawRow::rows_from_response(Value::Array(matches)))
            }
            Some(MockResponse::Failure(message)) => Err(Error::backend(procedure.name(), message)),
            Some(MockResponse::Hang) => std::future::pending::<Result<Vec<RawRow>>>().await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::queries::DashboardQueries;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_unconfigured_procedure_returns_no_rows() {
        let backend = MockBackend::new();
        let rows = backend.rpc(Procedure::CallData, json!({})).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(backend.call_count(Procedure::CallData), 1);
    }

    #[tokio::test]
    async fn test_gate_holds_reply_until_released() {
        let backend = Arc::new(
            MockBackend::new()
                .with_response(Procedure::IssueCounts, MockResponse::rows(json!([["GPS", 1]]))),
        );
        let gate = backend.gate(Procedure::IssueCounts);

        let task = tokio::spawn({
            let backend = Arc::clone(&backend);
            async move { backend.rpc(Procedure::IssueCounts, json!({})).await }
        });

        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        let rows = task.await.unwrap().unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_demo_data_maps_cleanly() {
        let backend = MockBackend::demo();

        let summary = DashboardQueries::call_summary(&backend).await.unwrap();
        assert_eq!(summary.total_calls, 247);
        assert!(summary.top_issue_count <= summary.total_calls);

        let weekdays = DashboardQueries::weekday_call_counts(&backend).await.unwrap();
        assert_eq!(weekdays.first().unwrap().day, "Mon");
        assert_eq!(weekdays.len(), 7);

        let distribution = DashboardQueries::issue_distribution(&backend).await.unwrap();
        let total: f64 = distribution.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() < 1.0);

        let calls = DashboardQueries::call_data(&backend).await.unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].status().label(), "Escalated");

        let call = DashboardQueries::recent_call(&backend, "c-0003").await.unwrap();
        assert_eq!(call.customer.name, "Robert Chen");
        assert!(DashboardQueries::recent_call(&backend, "nope").await.is_err());
    }
}
