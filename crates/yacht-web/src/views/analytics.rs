//! Analytics: call-center metrics, sentiment and resolution trends, issue
//! distribution

use crate::presentation::{
    BarPoint, ErrorPanel, KpiCard, Region, ResolutionPoint, SentimentPoint, Slice,
    distribution_slices, resolution_series, sentiment_series,
};
use crate::view_state::ViewStatus;
use serde::Serialize;
use std::sync::Arc;
use yacht_core::utils::{format_duration_long, round_percent};
use yacht_core::{
    CallCenterMetrics, DailyResolutionEntry, DailySentimentEntry, IssueDistributionEntry, Result,
};
use yacht_data::{Backend, DashboardQueries};

/// Data behind the analytics page
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsData {
    /// Aggregate metrics
    pub metrics: CallCenterMetrics,
    /// Issue shares
    pub distribution: Vec<IssueDistributionEntry>,
    /// Resolved vs escalated per day
    pub resolution: Vec<DailyResolutionEntry>,
    /// Sentiment split per day
    pub sentiment: Vec<DailySentimentEntry>,
}

/// Fetch the analytics batch; four concurrent procedures, whole-batch
/// failure.
///
/// # Errors
///
/// Returns the first failing procedure's error.
pub async fn fetch(backend: Arc<dyn Backend>) -> Result<AnalyticsData> {
    let backend = backend.as_ref();
    let (metrics, distribution, resolution, sentiment) = tokio::join!(
        DashboardQueries::call_center_metrics(backend),
        DashboardQueries::issue_distribution(backend),
        DashboardQueries::daily_resolution(backend),
        DashboardQueries::daily_sentiment(backend),
    );

    Ok(AnalyticsData {
        metrics: metrics?,
        distribution: distribution?,
        resolution: resolution?,
        sentiment: sentiment?,
    })
}

/// Analytics page payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsPage {
    /// View status name
    pub status: &'static str,
    /// Error panel when the batch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPanel>,
    /// Headline cards
    pub kpis: Region<Vec<KpiCard>>,
    /// Agent quality averages on a 0-10 scale
    pub agent_quality: Region<Vec<BarPoint>>,
    /// Sentiment analysis over time
    pub sentiment_trend: Region<Vec<SentimentPoint>>,
    /// Issue distribution
    pub issue_distribution: Region<Vec<Slice>>,
    /// Call resolution patterns
    pub resolution_patterns: Region<Vec<ResolutionPoint>>,
}

/// Render the analytics page for a view status
pub fn render(status: &ViewStatus<AnalyticsData>) -> AnalyticsPage {
    AnalyticsPage {
        status: status.name(),
        error: ErrorPanel::for_status(status),
        kpis: Region::from_status(status, |data| kpi_cards(&data.metrics)),
        agent_quality: Region::from_status(status, |data| quality_bars(&data.metrics)),
        sentiment_trend: Region::from_status(status, |data| sentiment_series(&data.sentiment)),
        issue_distribution: Region::from_status(status, |data| {
            distribution_slices(&data.distribution)
        }),
        resolution_patterns: Region::from_status(status, |data| {
            resolution_series(&data.resolution)
        }),
    }
}

fn kpi_cards(metrics: &CallCenterMetrics) -> Vec<KpiCard> {
    vec![
        KpiCard::new("Total Conversations", metrics.total_calls.to_string()),
        KpiCard::new("Avg Handle Time", format_duration_long(metrics.avg_duration)),
        KpiCard::new(
            "Resolution Rate",
            format!("{}%", round_percent(metrics.resolution_rate)),
        ),
        KpiCard::new(
            "Satisfaction Score",
            format!("{:.1}", metrics.avg_sentiment_score),
        ),
    ]
}

fn quality_bars(metrics: &CallCenterMetrics) -> Vec<BarPoint> {
    [
        ("Politeness", metrics.avg_politeness),
        ("Professionalism", metrics.avg_professionalism),
        ("Process Adherence", metrics.avg_process_adherence),
    ]
    .into_iter()
    .map(|(label, value)| BarPoint {
        label: label.to_string(),
        value,
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use yacht_data::{MockBackend, MockResponse, Procedure};

    #[tokio::test]
    async fn test_fetch_runs_four_procedures() {
        let backend = Arc::new(MockBackend::demo());
        let data = fetch(backend.clone()).await.unwrap();

        assert_eq!(backend.total_calls(), 4);
        let total: f64 = data.distribution.iter().map(|e| e.percentage).sum();
        assert!((total - 100.0).abs() <= 1.0);
        assert!(data.metrics.avg_politeness <= 10.0);
    }

    #[tokio::test]
    async fn test_positional_rows_render_like_named() {
        let positional = Arc::new(MockBackend::new().with_response(
            Procedure::DailySentimentPct,
            MockResponse::rows(json!([["2024-01-09", 70, 20]])),
        ));
        let named = Arc::new(MockBackend::new().with_response(
            Procedure::DailySentimentPct,
            MockResponse::rows(json!([
                {"date": "2024-01-09", "positive_pct": 70, "negative_pct": 20}
            ])),
        ));

        let a = render(&ViewStatus::Loaded(fetch(positional).await.unwrap()));
        let b = render(&ViewStatus::Loaded(fetch(named).await.unwrap()));

        assert_eq!(a.sentiment_trend, b.sentiment_trend);
        let points = a.sentiment_trend.ready().unwrap();
        assert_eq!(points[0].date, "Jan 9");
        assert_eq!(points[0].neutral, 10);
    }

    #[test]
    fn test_quality_bars_order() {
        let bars = quality_bars(&CallCenterMetrics {
            avg_politeness: 9.0,
            avg_professionalism: 8.0,
            avg_process_adherence: 7.0,
            ..CallCenterMetrics::default()
        });
        let labels: Vec<_> = bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, vec!["Politeness", "Professionalism", "Process Adherence"]);
    }
}
