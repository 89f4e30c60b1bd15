//! Canonical dashboard entities
//!
//! Every backend row, whatever shape it arrived in, ends up as one of these
//! records. They are transient: a view owns them until it refetches or is
//! torn down.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Call identifier as issued by the backend (a vCon UUID in practice)
pub type CallId = String;

/// Sentiment classification of a call
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    /// Positive sentiment
    Positive,
    /// Neutral sentiment
    Neutral,
    /// Negative sentiment
    Negative,
    /// Missing or unrecognised label
    #[default]
    Unknown,
}

impl SentimentLabel {
    /// Parse a label leniently; anything unrecognised becomes `Unknown`
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Self::Positive,
            "neutral" => Self::Neutral,
            "negative" | "neg" => Self::Negative,
            _ => Self::Unknown,
        }
    }

    /// Lowercase name as used in filters and CSS hooks
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline metrics returned by `get_call_summary`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallSummaryMetrics {
    /// Total number of calls
    pub total_calls: u64,
    /// Average handle time in seconds
    pub avg_handle_time: f64,
    /// Dominant sentiment score
    pub sentiment_score: f64,
    /// Most frequent issue label
    pub top_issue: String,
    /// Number of calls carrying the top issue; never exceeds `total_calls`
    pub top_issue_count: u64,
    /// Agent who handled the most calls
    pub busiest_agent: String,
    /// Total talk time in seconds
    pub total_duration: f64,
    /// Share of positive calls, 0-100
    pub percent_positive: f64,
}

/// Calls per weekday (`get_weekday_call_counts`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekdayCallCount {
    /// Short weekday name (`Mon` .. `Sun`)
    pub day: String,
    /// Number of calls
    pub calls: u64,
}

/// Calls per issue label (`get_issue_counts`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueCount {
    /// Issue label
    pub issue: String,
    /// Number of calls
    pub count: u64,
}

/// Share of calls per issue label (`get_issue_distribution`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IssueDistributionEntry {
    /// Issue label, unique within a result set
    pub issue: String,
    /// Percentage share, 0-100
    pub percentage: f64,
}

/// Resolved vs escalated calls for one day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyResolutionEntry {
    /// Calendar date
    pub date: Option<NaiveDate>,
    /// Resolved calls
    pub resolved: u64,
    /// Escalated calls
    pub escalated: u64,
}

/// Sentiment split for one day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailySentimentEntry {
    /// Calendar date
    pub date: Option<NaiveDate>,
    /// Positive share, 0-100
    pub positive_pct: f64,
    /// Negative share, 0-100
    pub negative_pct: f64,
}

impl DailySentimentEntry {
    /// Neutral share derived as the remainder, never negative
    pub fn neutral_pct(&self) -> f64 {
        (100.0 - self.positive_pct - self.negative_pct).max(0.0)
    }
}

/// Aggregate call-center metrics (`get_call_center_metrics`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallCenterMetrics {
    /// Total number of calls
    pub total_calls: u64,
    /// Average call duration in seconds
    pub avg_duration: f64,
    /// Share of resolved calls, 0-100
    pub resolution_rate: f64,
    /// Average sentiment score
    pub avg_sentiment_score: f64,
    /// Average agent politeness, 0-10
    pub avg_politeness: f64,
    /// Average agent professionalism, 0-10
    pub avg_professionalism: f64,
    /// Average process adherence, 0-10
    pub avg_process_adherence: f64,
}

/// A participant in a call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Party {
    /// Display name
    pub name: String,
    /// Email address or phone number
    pub contact: String,
}

/// Optional agent quality sub-scores, each 0-10
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityScores {
    /// Use of the customer's name, "please", "thank you"
    pub politeness: Option<f64>,
    /// Introductions, confirmations, expectation setting
    pub professionalism: Option<f64>,
    /// Verification and confirmation steps followed
    pub process_adherence: Option<f64>,
}

impl QualityScores {
    /// True when no sub-score is present
    pub const fn is_empty(&self) -> bool {
        self.politeness.is_none()
            && self.professionalism.is_none()
            && self.process_adherence.is_none()
    }
}

/// One speaker-tagged utterance in a structured transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Utterance {
    /// Speaker role, e.g. `agent` or `customer`
    #[serde(alias = "speaker")]
    pub role: String,
    /// Spoken text
    #[serde(alias = "text")]
    pub content: String,
    /// Offset from call start in seconds
    #[serde(alias = "start")]
    pub start_time: f64,
}

/// Call transcript: structured utterances or an undifferentiated text block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Transcript {
    /// Ordered speaker turns
    Utterances(Vec<Utterance>),
    /// Plain text, rendered as one block
    Plain(String),
}

impl Default for Transcript {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl Transcript {
    /// True when there is nothing to show
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Utterances(turns) => turns.is_empty(),
            Self::Plain(text) => text.trim().is_empty(),
        }
    }

    /// Flatten to text, one `role: content` line per utterance
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Utterances(turns) => turns
                .iter()
                .map(|turn| format!("{}: {}", turn.role, turn.content))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A single recorded support call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CallRecord {
    /// Unique call identifier
    pub call_id: CallId,
    /// When the call started
    pub call_timestamp: Option<DateTime<Utc>>,
    /// Calendar date key
    pub date_id: Option<NaiveDate>,
    /// Handling agent
    pub agent: Party,
    /// Calling customer
    pub customer: Party,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Issue label
    pub issue_type: String,
    /// Sentiment label
    pub sentiment: SentimentLabel,
    /// Numeric sentiment score
    pub sentiment_score: f64,
    /// Agent quality sub-scores
    pub quality: QualityScores,
    /// Whether the issue was resolved, when known
    pub resolved: Option<bool>,
    /// Call disposition (`escalated`, `callback`, ...)
    pub disposition: String,
    /// Recording location
    pub audio_url: Option<String>,
    /// Free-text summary
    pub summary: String,
    /// Transcript
    pub transcript: Transcript,
}

/// Display status derived from resolution flags
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Issue resolved on the call
    Resolved,
    /// Handed off to another team
    Escalated,
    /// Still open
    InProgress,
}

impl ResolutionStatus {
    /// Label shown in tables and used by the status filter
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resolved => "Resolved",
            Self::Escalated => "Escalated",
            Self::InProgress => "In Progress",
        }
    }
}

impl CallRecord {
    /// Status for display: resolved wins, then an escalation disposition
    pub fn status(&self) -> ResolutionStatus {
        if self.resolved == Some(true) {
            ResolutionStatus::Resolved
        } else if self.disposition.to_ascii_lowercase().contains("escalat") {
            ResolutionStatus::Escalated
        } else {
            ResolutionStatus::InProgress
        }
    }
}

/// Who authored a chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The dashboard user
    User,
    /// The answer service
    Assistant,
}

impl ChatRole {
    /// Wire name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Answer confidence reported by the chat service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Low confidence
    Low,
    /// Medium confidence
    Medium,
    /// High confidence
    High,
}

/// Reference to a call the answer was grounded on
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CallSource {
    /// Call identifier
    pub call_id: CallId,
    /// Agent name (or id when the service only knows the id)
    #[serde(alias = "agent_id")]
    pub agent_name: String,
    /// Customer name
    pub customer_name: String,
    /// Call timestamp as sent by the service
    pub call_timestamp: String,
    /// Issue label
    pub issue_type: String,
    /// Short summary excerpt
    pub summary: Option<String>,
    /// Sentiment label
    pub sentiment: Option<String>,
    /// Retrieval similarity
    pub similarity: Option<f64>,
}

/// One bubble in the assistant conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    /// Author
    pub role: ChatRole,
    /// Text content
    pub content: String,
    /// Calls the answer cites
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<CallSource>,
    /// Answer confidence, assistant turns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// When the turn was created
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    /// A user turn stamped now
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            sources: Vec::new(),
            confidence: None,
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn stamped now
    pub fn assistant(
        content: impl Into<String>,
        sources: Vec<CallSource>,
        confidence: Option<Confidence>,
    ) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            sources,
            confidence,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("positive", SentimentLabel::Positive)]
    #[case("  Negative ", SentimentLabel::Negative)]
    #[case("NEUTRAL", SentimentLabel::Neutral)]
    #[case("mixed", SentimentLabel::Unknown)]
    #[case("", SentimentLabel::Unknown)]
    fn test_sentiment_parse_lenient(#[case] raw: &str, #[case] expected: SentimentLabel) {
        assert_eq!(SentimentLabel::parse_lenient(raw), expected);
    }

    #[test]
    fn test_neutral_is_remainder() {
        let entry = DailySentimentEntry {
            date: None,
            positive_pct: 70.0,
            negative_pct: 20.0,
        };
        assert_eq!(entry.neutral_pct(), 10.0);
    }

    #[test]
    fn test_neutral_clamps_at_zero() {
        let entry = DailySentimentEntry {
            date: None,
            positive_pct: 90.0,
            negative_pct: 20.0,
        };
        assert_eq!(entry.neutral_pct(), 0.0);
    }

    #[test]
    fn test_transcript_untagged_serialization() {
        let plain = Transcript::Plain("hello".to_string());
        assert_eq!(serde_json::to_string(&plain).unwrap(), "\"hello\"");

        let turns = Transcript::Utterances(vec![Utterance {
            role: "agent".to_string(),
            content: "hi".to_string(),
            start_time: 1.5,
        }]);
        let json = serde_json::to_value(&turns).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "agent");
    }

    #[test]
    fn test_transcript_plain_text_flattening() {
        let transcript = Transcript::Utterances(vec![
            Utterance {
                role: "agent".to_string(),
                content: "Hello".to_string(),
                start_time: 0.0,
            },
            Utterance {
                role: "customer".to_string(),
                content: "Hi".to_string(),
                start_time: 2.0,
            },
        ]);
        assert_eq!(transcript.to_plain_text(), "agent: Hello\ncustomer: Hi");
        assert!(!transcript.is_empty());
        assert!(Transcript::default().is_empty());
    }

    #[test]
    fn test_call_status_derivation() {
        let mut call = CallRecord {
            resolved: Some(true),
            ..CallRecord::default()
        };
        assert_eq!(call.status(), ResolutionStatus::Resolved);

        call.resolved = Some(false);
        call.disposition = "Escalated to tech team".to_string();
        assert_eq!(call.status(), ResolutionStatus::Escalated);

        call.disposition = String::new();
        assert_eq!(call.status(), ResolutionStatus::InProgress);
        assert_eq!(call.status().label(), "In Progress");
    }

    #[test]
    fn test_call_source_accepts_agent_id() {
        let source: CallSource = serde_json::from_value(serde_json::json!({
            "call_id": "c-1",
            "agent_id": "agent-7",
            "similarity": 0.91
        }))
        .unwrap();

        assert_eq!(source.agent_name, "agent-7");
        assert_eq!(source.similarity, Some(0.91));
        assert!(source.customer_name.is_empty());
    }

    proptest! {
        #[test]
        fn prop_neutral_share_stays_in_range(positive in 0.0f64..=100.0, negative in 0.0f64..=100.0) {
            let entry = DailySentimentEntry { date: None, positive_pct: positive, negative_pct: negative };
            let neutral = entry.neutral_pct();
            prop_assert!((0.0..=100.0).contains(&neutral));
        }

        #[test]
        fn prop_sentiment_parse_ignores_case(raw in "[a-zA-Z ]{0,12}") {
            prop_assert_eq!(
                SentimentLabel::parse_lenient(&raw),
                SentimentLabel::parse_lenient(&raw.to_ascii_uppercase())
            );
        }
    }
}
