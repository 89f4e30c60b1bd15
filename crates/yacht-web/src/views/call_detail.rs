//! Call detail, addressed by call id

use crate::presentation::{
    ErrorPanel, Region, TranscriptView, call_href, timestamp_label, transcript_view,
};
use crate::view_state::{ViewState, ViewStatus};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use yacht_core::utils::{format_duration_clock, sentiment_badge_class};
use yacht_core::{CallRecord, Party, Result};
use yacht_data::{Backend, DashboardQueries};

/// Fetch one call
///
/// # Errors
///
/// Returns `Error::NotFound` for an unknown id, or the backend error.
pub async fn fetch(backend: Arc<dyn Backend>, call_id: String) -> Result<CallRecord> {
    DashboardQueries::recent_call(backend.as_ref(), &call_id).await
}

/// One quality sub-score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityBar {
    /// Label
    pub label: &'static str,
    /// Score out of 10
    pub score: f64,
}

/// Call overview card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallOverview {
    /// Call id
    pub call_id: String,
    /// Link to this page
    pub href: String,
    /// Agent
    pub agent: Party,
    /// Customer
    pub customer: Party,
    /// `Jan 9, 2024 02:32 PM`
    pub started: String,
    /// `m:ss`
    pub duration: String,
    /// Issue label
    pub issue: String,
    /// Resolution status label
    pub status: &'static str,
    /// Sentiment label
    pub sentiment: &'static str,
    /// Badge classes for the sentiment
    pub sentiment_class: &'static str,
    /// Numeric sentiment score
    pub sentiment_score: f64,
    /// Present quality sub-scores
    pub quality: Vec<QualityBar>,
    /// Free-text summary
    pub summary: String,
    /// Recording location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// Call detail page payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallDetailPage {
    /// View status name
    pub status: &'static str,
    /// Error panel when the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPanel>,
    /// Overview card
    pub overview: Region<CallOverview>,
    /// Transcript tab
    pub transcript: Region<TranscriptView>,
}

impl CallDetailPage {
    /// Whether the call does not exist
    pub fn is_not_found(&self) -> bool {
        self.error.as_ref().is_some_and(|panel| !panel.retryable)
    }
}

/// Render the call detail page for a view status
pub fn render(status: &ViewStatus<CallRecord>) -> CallDetailPage {
    CallDetailPage {
        status: status.name(),
        error: ErrorPanel::for_status(status),
        overview: Region::from_status(status, overview),
        transcript: Region::from_status(status, |record| transcript_view(&record.transcript)),
    }
}

/// Load a call through a short-lived view and render it.
///
/// The view is torn down once rendered.
pub async fn load(backend: Arc<dyn Backend>, call_id: &str) -> CallDetailPage {
    let view = ViewState::new("call_detail");
    let id = call_id.to_string();
    view.activate(move || fetch(backend, id));

    let page = render(&view.settled().await);
    view.teardown();
    debug!(call_id, status = page.status, "call detail rendered");
    page
}

fn overview(record: &CallRecord) -> CallOverview {
    let quality = [
        ("Politeness", record.quality.politeness),
        ("Professionalism", record.quality.professionalism),
        ("Process Adherence", record.quality.process_adherence),
    ]
    .into_iter()
    .filter_map(|(label, score)| score.map(|score| QualityBar { label, score }))
    .collect();

    CallOverview {
        call_id: record.call_id.clone(),
        href: call_href(&record.call_id),
        agent: record.agent.clone(),
        customer: record.customer.clone(),
        started: timestamp_label(record.call_timestamp.as_ref()),
        duration: format_duration_clock(record.duration_seconds),
        issue: record.issue_type.clone(),
        status: record.status().label(),
        sentiment: record.sentiment.as_str(),
        sentiment_class: sentiment_badge_class(record.sentiment.as_str()),
        sentiment_score: record.sentiment_score,
        quality,
        summary: record.summary.clone(),
        audio_url: record.audio_url.clone(),
    }
}
