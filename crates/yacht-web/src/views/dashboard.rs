//! Dashboard home: headline numbers, weekday volume and issue mix

use crate::presentation::{
    BarPoint, ErrorPanel, KpiCard, Region, Slice, issue_slices, weekday_bars,
};
use crate::view_state::ViewStatus;
use serde::Serialize;
use std::sync::Arc;
use yacht_core::utils::{format_duration_long, round_percent};
use yacht_core::{CallSummaryMetrics, IssueCount, Result, WeekdayCallCount};
use yacht_data::{Backend, DashboardQueries};

/// Data behind the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    /// Headline metrics
    pub summary: CallSummaryMetrics,
    /// Calls per weekday
    pub weekday: Vec<WeekdayCallCount>,
    /// Calls per issue
    pub issues: Vec<IssueCount>,
}

/// Fetch the dashboard batch.
///
/// The three procedures run concurrently and all of them settle before the
/// batch does; any failure fails the batch.
///
/// # Errors
///
/// Returns the first failing procedure's error.
pub async fn fetch(backend: Arc<dyn Backend>) -> Result<DashboardData> {
    let backend = backend.as_ref();
    let (summary, weekday, issues) = tokio::join!(
        DashboardQueries::call_summary(backend),
        DashboardQueries::weekday_call_counts(backend),
        DashboardQueries::issue_counts(backend),
    );

    Ok(DashboardData {
        summary: summary?,
        weekday: weekday?,
        issues: issues?,
    })
}

/// Busiest agent and top issue cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlights {
    /// Agent with the most calls
    pub busiest_agent: String,
    /// Most common issue
    pub top_issue: String,
    /// Calls with the most common issue
    pub top_issue_count: u64,
    /// Share of positive calls
    pub percent_positive: i64,
}

/// Dashboard page payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    /// View status name
    pub status: &'static str,
    /// Error panel when the batch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPanel>,
    /// Headline cards
    pub kpis: Region<Vec<KpiCard>>,
    /// Call volume trend
    pub call_volume: Region<Vec<BarPoint>>,
    /// Conversation types
    pub conversation_types: Region<Vec<Slice>>,
    /// Highlight cards
    pub highlights: Region<Highlights>,
}

/// Render the dashboard for a view status
pub fn render(status: &ViewStatus<DashboardData>) -> DashboardPage {
    DashboardPage {
        status: status.name(),
        error: ErrorPanel::for_status(status),
        kpis: Region::from_status(status, |data| kpi_cards(&data.summary)),
        call_volume: Region::from_status(status, |data| weekday_bars(&data.weekday)),
        conversation_types: Region::from_status(status, |data| issue_slices(&data.issues)),
        highlights: Region::from_status(status, |data| Highlights {
            busiest_agent: data.summary.busiest_agent.clone(),
            top_issue: data.summary.top_issue.clone(),
            top_issue_count: data.summary.top_issue_count,
            percent_positive: round_percent(data.summary.percent_positive),
        }),
    }
}

fn kpi_cards(summary: &CallSummaryMetrics) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Total Calls", summary.total_calls.to_string()),
        KpiCard::new(
            "Avg Resolution Time",
            format_duration_long(summary.avg_handle_time),
        ),
        KpiCard::new("Frequent Sentiment", format!("{:.1}", summary.sentiment_score)),
        KpiCard::new("Top Issues", summary.top_issue.clone())
            .with_detail(format!("{} calls", summary.top_issue_count)),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view_state::ViewError;
    use pretty_assertions::assert_eq;
    use yacht_data::{MockBackend, MockResponse, Procedure};

    #[tokio::test]
    async fn test_fetch_demo_batch() {
        let backend = Arc::new(MockBackend::demo());
        let data = fetch(backend.clone()).await.unwrap();

        assert!(data.summary.top_issue_count <= data.summary.total_calls);
        assert_eq!(data.weekday[0].day, "Mon");
        assert!(!data.issues.is_empty());
        assert_eq!(backend.total_calls(), 3);
    }

    #[tokio::test]
    async fn test_fetch_fails_as_a_whole() {
        let backend = Arc::new(MockBackend::demo().with_response(
            Procedure::IssueCounts,
            MockResponse::failure("relation does not exist"),
        ));

        let err = fetch(backend.clone()).await.unwrap_err();
        assert!(matches!(err, yacht_core::Error::Backend { .. }));
        // The sibling calls still ran to completion
        assert_eq!(backend.call_count(Procedure::CallSummary), 1);
        assert_eq!(backend.call_count(Procedure::WeekdayCallCounts), 1);
    }

    #[tokio::test]
    async fn test_render_states() {
        let loading = render(&ViewStatus::Loading);
        assert_eq!(loading.status, "loading");
        assert_eq!(loading.kpis, Region::Skeleton);
        assert_eq!(loading.error, None);

        let data = fetch(Arc::new(MockBackend::demo())).await.unwrap();
        let loaded = render(&ViewStatus::Loaded(data));
        assert_eq!(loaded.kpis.ready().unwrap().len(), 4);
        assert_eq!(loaded.kpis.ready().unwrap()[0].title, "Total Calls");

        let failed = render(&ViewStatus::Errored(ViewError {
            message: "Failed to load data from the backend".to_string(),
            not_found: false,
        }));
        assert_eq!(failed.call_volume, Region::Failed);
        assert!(failed.error.unwrap().retryable);
    }
}
