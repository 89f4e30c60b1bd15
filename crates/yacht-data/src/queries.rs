//! Backend procedure catalogue and typed fetchers

use crate::client::Backend;
use crate::mappers;
use serde_json::{Value, json};
use std::fmt;
use tracing::debug;
use yacht_core::{
    CallCenterMetrics, CallRecord, CallSummaryMetrics, DailyResolutionEntry, DailySentimentEntry,
    Error, IssueCount, IssueDistributionEntry, Result, WeekdayCallCount,
};

/// Remote procedures exposed by the analytics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Procedure {
    /// Headline metrics
    CallSummary,
    /// Calls per weekday
    WeekdayCallCounts,
    /// Calls per issue label
    IssueCounts,
    /// Share of calls per issue label
    IssueDistribution,
    /// Resolved vs escalated per day
    DailyResolutionStatus,
    /// Positive/negative share per day
    DailySentimentPct,
    /// Aggregate call-center metrics
    CallCenterMetrics,
    /// Full call list
    CallData,
    /// One call by id
    RecentCall,
}

impl Procedure {
    /// Every procedure, in catalogue order
    pub const ALL: [Self; 9] = [
        Self::CallSummary,
        Self::WeekdayCallCounts,
        Self::IssueCounts,
        Self::IssueDistribution,
        Self::DailyResolutionStatus,
        Self::DailySentimentPct,
        Self::CallCenterMetrics,
        Self::CallData,
        Self::RecentCall,
    ];

    /// Name as registered with the backend
    pub const fn name(self) -> &'static str {
        match self {
            Self::CallSummary => "get_call_summary",
            Self::WeekdayCallCounts => "get_weekday_call_counts",
            Self::IssueCounts => "get_issue_counts",
            Self::IssueDistribution => "get_issue_distribution",
            Self::DailyResolutionStatus => "get_daily_resolution_status",
            Self::DailySentimentPct => "get_daily_sentiment_pct",
            Self::CallCenterMetrics => "get_call_center_metrics",
            Self::CallData => "get_call_data",
            Self::RecentCall => "get_recent_call",
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn no_params() -> Value {
    json!({})
}

/// Typed access to the backend procedures
#[derive(Debug)]
pub struct DashboardQueries;

impl DashboardQueries {
    /// Headline metrics
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn call_summary<B: Backend + ?Sized>(backend: &B) -> Result<CallSummaryMetrics> {
        let rows = backend.rpc(Procedure::CallSummary, no_params()).await?;
        Ok(mappers::map_call_summary(&rows))
    }

    /// Calls per weekday, Monday first
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn weekday_call_counts<B: Backend + ?Sized>(
        backend: &B,
    ) -> Result<Vec<WeekdayCallCount>> {
        let rows = backend.rpc(Procedure::WeekdayCallCounts, no_params()).await?;
        Ok(mappers::map_weekday_counts(&rows))
    }

    /// Calls per issue, largest first
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn issue_counts<B: Backend + ?Sized>(backend: &B) -> Result<Vec<IssueCount>> {
        let rows = backend.rpc(Procedure::IssueCounts, no_params()).await?;
        Ok(mappers::map_issue_counts(&rows))
    }

    /// Issue shares
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn issue_distribution<B: Backend + ?Sized>(
        backend: &B,
    ) -> Result<Vec<IssueDistributionEntry>> {
        let rows = backend.rpc(Procedure::IssueDistribution, no_params()).await?;
        Ok(mappers::map_issue_distribution(&rows))
    }

    /// Resolved vs escalated per day
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn daily_resolution<B: Backend + ?Sized>(
        backend: &B,
    ) -> Result<Vec<DailyResolutionEntry>> {
        let rows = backend
            .rpc(Procedure::DailyResolutionStatus, no_params())
            .await?;
        Ok(mappers::map_daily_resolution(&rows))
    }

    /// Sentiment split per day
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn daily_sentiment<B: Backend + ?Sized>(
        backend: &B,
    ) -> Result<Vec<DailySentimentEntry>> {
        let rows = backend.rpc(Procedure::DailySentimentPct, no_params()).await?;
        Ok(mappers::map_daily_sentiment(&rows))
    }

    /// Aggregate call-center metrics
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn call_center_metrics<B: Backend + ?Sized>(
        backend: &B,
    ) -> Result<CallCenterMetrics> {
        let rows = backend.rpc(Procedure::CallCenterMetrics, no_params()).await?;
        Ok(mappers::map_call_center_metrics(&rows))
    }

    /// Every call, backend order
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure call fails.
    pub async fn call_data<B: Backend + ?Sized>(backend: &B) -> Result<Vec<CallRecord>> {
        let rows = backend.rpc(Procedure::CallData, no_params()).await?;
        Ok(mappers::map_call_records(&rows))
    }

    /// One call by id; the first row wins when the backend returns several
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the backend has no such call, or an
    /// error if the procedure call fails.
    pub async fn recent_call<B: Backend + ?Sized>(backend: &B, call_id: &str) -> Result<CallRecord> {
        let rows = backend
            .rpc(Procedure::RecentCall, json!({ "r_call_id": call_id }))
            .await?;

        if rows.len() > 1 {
            debug!(call_id, rows = rows.len(), "multiple rows for one call, using the first");
        }

        rows.first()
            .map(mappers::map_call_record)
            .ok_or_else(|| Error::NotFound {
                resource: format!("call {call_id}"),
            })
    }
}
