//! Conversations list with search, status and sentiment filters
//!
//! Filtering runs over the loaded records only; changing a filter never
//! refetches.

use crate::presentation::{CallRow, ErrorPanel, Region, call_row};
use crate::view_state::ViewStatus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use yacht_core::{CallRecord, ResolutionStatus, Result, SentimentLabel};
use yacht_data::{Backend, DashboardQueries};

/// Fetch every call
///
/// # Errors
///
/// Returns an error if the procedure call fails.
pub async fn fetch(backend: Arc<dyn Backend>) -> Result<Vec<CallRecord>> {
    DashboardQueries::call_data(backend.as_ref()).await
}

/// Status filter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// No filtering
    #[default]
    All,
    /// Resolved calls
    Resolved,
    /// Open calls
    #[serde(alias = "in progress", alias = "in-progress")]
    InProgress,
    /// Escalated calls
    Escalated,
}

impl StatusFilter {
    fn matches(self, status: ResolutionStatus) -> bool {
        match self {
            Self::All => true,
            Self::Resolved => status == ResolutionStatus::Resolved,
            Self::InProgress => status == ResolutionStatus::InProgress,
            Self::Escalated => status == ResolutionStatus::Escalated,
        }
    }
}

/// Sentiment filter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentFilter {
    /// No filtering
    #[default]
    All,
    /// Positive calls
    Positive,
    /// Neutral calls
    Neutral,
    /// Negative calls
    Negative,
}

impl SentimentFilter {
    fn matches(self, sentiment: SentimentLabel) -> bool {
        match self {
            Self::All => true,
            Self::Positive => sentiment == SentimentLabel::Positive,
            Self::Neutral => sentiment == SentimentLabel::Neutral,
            Self::Negative => sentiment == SentimentLabel::Negative,
        }
    }
}

/// Filters applied to the loaded list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationFilter {
    /// Case-insensitive match on customer name or issue label
    pub search: String,
    /// Resolution status
    pub status: StatusFilter,
    /// Sentiment
    pub sentiment: SentimentFilter,
}

impl ConversationFilter {
    /// Whether a record passes every filter
    pub fn matches(&self, record: &CallRecord) -> bool {
        let term = self.search.trim().to_lowercase();
        let search_hit = term.is_empty()
            || record.customer.name.to_lowercase().contains(&term)
            || record.issue_type.to_lowercase().contains(&term);

        search_hit && self.status.matches(record.status()) && self.sentiment.matches(record.sentiment)
    }

    /// Records passing the filters, original order
    pub fn apply<'a>(&self, records: &'a [CallRecord]) -> Vec<&'a CallRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// Loaded list after filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTable {
    /// Calls loaded
    pub total: usize,
    /// Calls shown
    pub shown: usize,
    /// Table rows
    pub rows: Vec<CallRow>,
}

/// Conversations page payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationsPage {
    /// View status name
    pub status: &'static str,
    /// Error panel when the batch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPanel>,
    /// Filters in effect
    pub filter: ConversationFilter,
    /// Recent conversations
    pub conversations: Region<ConversationTable>,
}

/// Render the list for a view status under `filter`
pub fn render(status: &ViewStatus<Vec<CallRecord>>, filter: ConversationFilter) -> ConversationsPage {
    let conversations = Region::from_status(status, |records| {
        let rows: Vec<_> = filter.apply(records).into_iter().map(call_row).collect();
        ConversationTable {
            total: records.len(),
            shown: rows.len(),
            rows,
        }
    });

    ConversationsPage {
        status: status.name(),
        error: ErrorPanel::for_status(status),
        filter,
        conversations,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use yacht_data::MockBackend;

    async fn demo_records() -> Vec<CallRecord> {
        fetch(Arc::new(MockBackend::demo())).await.unwrap()
    }

    fn ids(filter: &ConversationFilter, records: &[CallRecord]) -> Vec<String> {
        filter
            .apply(records)
            .into_iter()
            .map(|record| record.call_id.clone())
            .collect()
    }

    #[rstest]
    #[case("", vec!["c-0001", "c-0002", "c-0003"])]
    #[case("thompson", vec!["c-0001"])]
    #[case("ENGINE", vec!["c-0002"])]
    #[case("  navigation ", vec!["c-0003"])]
    #[case("sarah", vec![])]
    #[tokio::test]
    async fn test_search(#[case] term: &str, #[case] expected: Vec<&str>) {
        let records = demo_records().await;
        let filter = ConversationFilter {
            search: term.to_string(),
            ..ConversationFilter::default()
        };
        assert_eq!(ids(&filter, &records), expected);
    }

    #[tokio::test]
    async fn test_status_and_sentiment_filters() {
        let records = demo_records().await;

        let escalated = ConversationFilter {
            status: StatusFilter::Escalated,
            ..ConversationFilter::default()
        };
        assert_eq!(ids(&escalated, &records), vec!["c-0003"]);

        let open_negative = ConversationFilter {
            status: StatusFilter::InProgress,
            sentiment: SentimentFilter::Negative,
            ..ConversationFilter::default()
        };
        assert!(ids(&open_negative, &records).is_empty());

        let neutral = ConversationFilter {
            sentiment: SentimentFilter::Neutral,
            ..ConversationFilter::default()
        };
        assert_eq!(ids(&neutral, &records), vec!["c-0002"]);
    }

    #[test]
    fn test_filter_query_spellings() {
        let filter: ConversationFilter =
            serde_json::from_value(serde_json::json!({"status": "in progress"})).unwrap();
        assert_eq!(filter.status, StatusFilter::InProgress);
        assert_eq!(filter.sentiment, SentimentFilter::All);
    }

    #[tokio::test]
    async fn test_render_counts() {
        let records = demo_records().await;
        let page = render(
            &ViewStatus::Loaded(records),
            ConversationFilter {
                status: StatusFilter::Resolved,
                ..ConversationFilter::default()
            },
        );

        let table = page.conversations.ready().unwrap();
        assert_eq!(table.total, 3);
        assert_eq!(table.shown, 1);
        assert_eq!(table.rows[0].customer, "Michael Thompson");
    }
}
