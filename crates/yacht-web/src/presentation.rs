//! Presentation models: chart series, table rows and chat bubbles
//!
//! Everything here is a pure function of canonical records. Views compose
//! these into page payloads.

use crate::view_state::{ViewError, ViewStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use yacht_assistant::types::{source_link, sources_label};
use yacht_core::utils::{
    clock_time, confidence_class, format_duration_clock, format_duration_long, long_date,
    palette_color, round_percent, sentiment_badge_class, short_date,
};
use yacht_core::{
    CallRecord, ChatTurn, Confidence, DailyResolutionEntry, DailySentimentEntry, IssueCount,
    IssueDistributionEntry, Transcript, WeekdayCallCount,
};

/// One data region of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Region<T> {
    /// Placeholder while the batch is in flight
    Skeleton,
    /// Rendered content
    Ready(T),
    /// The batch failed
    Failed,
}

impl<T> Region<T> {
    /// Region for a view status, rendering loaded data with `render`
    pub fn from_status<D>(status: &ViewStatus<D>, render: impl FnOnce(&D) -> T) -> Self {
        match status {
            ViewStatus::Idle | ViewStatus::Loading => Self::Skeleton,
            ViewStatus::Loaded(data) => Self::Ready(render(data)),
            ViewStatus::Errored(_) => Self::Failed,
        }
    }

    /// Rendered content, if any
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Skeleton | Self::Failed => None,
        }
    }
}

/// Error panel with a manual retry action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPanel {
    /// Message shown to the user
    pub message: String,
    /// Whether "try again" is offered
    pub retryable: bool,
}

impl ErrorPanel {
    /// Panel for an errored view, `None` otherwise
    pub fn for_status<D>(status: &ViewStatus<D>) -> Option<Self> {
        match status {
            ViewStatus::Errored(ViewError { message, not_found }) => Some(Self {
                message: message.clone(),
                retryable: !not_found,
            }),
            _ => None,
        }
    }
}

/// Headline number card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    /// Card title
    pub title: &'static str,
    /// Formatted value
    pub value: String,
    /// Secondary line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl KpiCard {
    /// Card with no secondary line
    pub fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
            detail: None,
        }
    }

    /// Attach a secondary line
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Bar chart point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    /// Axis label
    pub label: String,
    /// Bar value
    pub value: f64,
}

/// Categorical slice (pie or stacked bar)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    /// Category label
    pub label: String,
    /// Raw value
    pub value: f64,
    /// Share rounded for display
    pub percent: i64,
    /// Series color
    pub color: &'static str,
}

/// Daily resolution chart point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPoint {
    /// Short date, empty when the row had none
    pub date: String,
    /// Resolved calls
    pub resolved: u64,
    /// Escalated calls
    pub escalated: u64,
}

/// Daily sentiment chart point, whole percentages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentPoint {
    /// Short date, empty when the row had none
    pub date: String,
    /// Positive share
    pub positive: i64,
    /// Neutral share
    pub neutral: i64,
    /// Negative share
    pub negative: i64,
}

/// Conversation table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRow {
    /// Call id
    pub call_id: String,
    /// Customer name
    pub customer: String,
    /// Agent name
    pub agent: String,
    /// Issue label
    pub issue: String,
    /// `12m 34s`
    pub duration: String,
    /// Resolution status label
    pub status: &'static str,
    /// Sentiment label
    pub sentiment: &'static str,
    /// Badge classes for the sentiment
    pub sentiment_class: &'static str,
    /// `Jan 9, 2024`
    pub date: String,
    /// `02:32 PM`
    pub time: String,
    /// Call detail link
    pub href: String,
}

/// Rendered transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum TranscriptView {
    /// Speaker turns
    Utterances(Vec<UtteranceRow>),
    /// One undifferentiated block
    Plain(String),
}

/// One rendered utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtteranceRow {
    /// Speaker role
    pub role: String,
    /// Spoken text
    pub content: String,
    /// Offset as `m:ss`
    pub at: String,
}

/// Link to a cited call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLink {
    /// Call id
    pub call_id: String,
    /// Link target
    pub href: String,
}

/// One chat bubble
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatBubble {
    /// `user` or `assistant`
    pub role: &'static str,
    /// Text
    pub content: String,
    /// `02:32 PM`
    pub time: String,
    /// Confidence level, assistant turns only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<&'static str>,
    /// Text class for the confidence level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_class: Option<&'static str>,
    /// "N relevant call(s)"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_label: Option<String>,
    /// Cited calls
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceLink>,
}

/// Weekday call volume bars, in the order given
pub fn weekday_bars(counts: &[WeekdayCallCount]) -> Vec<BarPoint> {
    counts
        .iter()
        .map(|count| BarPoint {
            label: count.day.clone(),
            value: count_value(count.calls),
        })
        .collect()
}

/// Issue count slices; share is of the listed total
pub fn issue_slices(counts: &[IssueCount]) -> Vec<Slice> {
    let total: u64 = counts.iter().map(|count| count.count).sum();
    counts
        .iter()
        .enumerate()
        .map(|(index, count)| {
            let value = count_value(count.count);
            let share = if total == 0 {
                0.0
            } else {
                value * 100.0 / count_value(total)
            };
            Slice {
                label: count.issue.clone(),
                value,
                percent: round_percent(share),
                color: palette_color(index),
            }
        })
        .collect()
}

/// Issue distribution slices
pub fn distribution_slices(entries: &[IssueDistributionEntry]) -> Vec<Slice> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Slice {
            label: entry.issue.clone(),
            value: entry.percentage,
            percent: round_percent(entry.percentage),
            color: palette_color(index),
        })
        .collect()
}

/// Resolution chart series
pub fn resolution_series(entries: &[DailyResolutionEntry]) -> Vec<ResolutionPoint> {
    entries
        .iter()
        .map(|entry| ResolutionPoint {
            date: entry.date.map(short_date).unwrap_or_default(),
            resolved: entry.resolved,
            escalated: entry.escalated,
        })
        .collect()
}

/// Sentiment chart series
pub fn sentiment_series(entries: &[DailySentimentEntry]) -> Vec<SentimentPoint> {
    entries
        .iter()
        .map(|entry| SentimentPoint {
            date: entry.date.map(short_date).unwrap_or_default(),
            positive: round_percent(entry.positive_pct),
            neutral: round_percent(entry.neutral_pct()),
            negative: round_percent(entry.negative_pct),
        })
        .collect()
}

/// Table row for a call
pub fn call_row(record: &CallRecord) -> CallRow {
    CallRow {
        call_id: record.call_id.clone(),
        customer: record.customer.name.clone(),
        agent: record.agent.name.clone(),
        issue: record.issue_type.clone(),
        duration: format_duration_long(record.duration_seconds),
        status: record.status().label(),
        sentiment: record.sentiment.as_str(),
        sentiment_class: sentiment_badge_class(record.sentiment.as_str()),
        date: record.call_timestamp.as_ref().map(long_date).unwrap_or_default(),
        time: record.call_timestamp.as_ref().map(clock_time).unwrap_or_default(),
        href: call_href(&record.call_id),
    }
}

/// Link target of a call detail page
pub fn call_href(call_id: &str) -> String {
    source_link(&yacht_core::CallSource {
        call_id: call_id.to_string(),
        ..yacht_core::CallSource::default()
    })
}

/// Transcript as utterance rows or a plain block
pub fn transcript_view(transcript: &Transcript) -> TranscriptView {
    match transcript {
        Transcript::Utterances(turns) => TranscriptView::Utterances(
            turns
                .iter()
                .map(|turn| UtteranceRow {
                    role: turn.role.clone(),
                    content: turn.content.clone(),
                    at: format_duration_clock(turn.start_time),
                })
                .collect(),
        ),
        Transcript::Plain(text) => TranscriptView::Plain(text.clone()),
    }
}

/// Bubble for a chat turn
pub fn chat_bubble(turn: &ChatTurn) -> ChatBubble {
    let confidence = turn.confidence.map(confidence_name);
    ChatBubble {
        role: turn.role.as_str(),
        content: turn.content.clone(),
        time: clock_time(&turn.timestamp),
        confidence,
        confidence_class: confidence.map(confidence_class),
        sources_label: (!turn.sources.is_empty()).then(|| sources_label(turn.sources.len())),
        sources: turn
            .sources
            .iter()
            .map(|source| SourceLink {
                call_id: source.call_id.clone(),
                href: source_link(source),
            })
            .collect(),
    }
}

/// `Jan 9, 2024 02:32 PM`, empty for a missing timestamp
pub fn timestamp_label(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp
        .map(|ts| format!("{} {}", long_date(ts), clock_time(ts)))
        .unwrap_or_default()
}

const fn confidence_name(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::Low => "low",
        Confidence::Medium => "medium",
        Confidence::High => "high",
    }
}

#[allow(clippy::cast_precision_loss)]
fn count_value(count: u64) -> f64 {
    count as f64
}
