//! Backend row fixtures in the shapes the procedures return them

use serde_json::{Value, json};
use yacht_data::{MockBackend, MockResponse, Procedure};

/// Call summary as a named object
pub fn summary_named() -> Value {
    json!([{
        "total_calls": 120,
        "avg_handle_time": 754,
        "sentiment_score": 4.2,
        "top_issue": "GPS Issues",
        "top_issue_count": 31,
        "busiest_agent": "Sarah Johnson",
        "total_duration": 90_480,
        "percent_positive": 66.6
    }])
}

/// The same summary as a positional tuple
pub fn summary_positional() -> Value {
    json!([[120, 754, 4.2, "GPS Issues", 31, "Sarah Johnson", 90_480, 66.6]])
}

/// Weekday counts as `f1`/`f2` composite records, out of order
pub fn weekday_composite() -> Value {
    json!([
        {"f1": "Wednesday", "f2": 19},
        {"f1": "Monday", "f2": 12},
        {"f1": "Tuesday", "f2": 17}
    ])
}

/// The same weekday counts as named rows
pub fn weekday_named() -> Value {
    json!([
        {"day": "Monday", "calls": 12},
        {"day": "Tuesday", "calls": 17},
        {"day": "Wednesday", "calls": 19}
    ])
}

/// Issue counts as tuples
pub fn issues_positional() -> Value {
    json!([["Engine Support", 20], ["GPS Issues", 31], ["Navigation", 9]])
}

/// The same issue counts as named rows
pub fn issues_named() -> Value {
    json!([
        {"issue": "GPS Issues", "count": 31},
        {"issue": "Engine Support", "count": 20},
        {"issue": "Navigation", "count": 9}
    ])
}

/// Backend answering the dashboard procedures with positional rows
pub fn positional_dashboard_backend() -> MockBackend {
    MockBackend::new()
        .with_response(Procedure::CallSummary, MockResponse::rows(summary_positional()))
        .with_response(
            Procedure::WeekdayCallCounts,
            MockResponse::rows(weekday_composite()),
        )
        .with_response(Procedure::IssueCounts, MockResponse::rows(issues_positional()))
}

/// Backend answering the dashboard procedures with named rows
pub fn named_dashboard_backend() -> MockBackend {
    MockBackend::new()
        .with_response(Procedure::CallSummary, MockResponse::rows(summary_named()))
        .with_response(Procedure::WeekdayCallCounts, MockResponse::rows(weekday_named()))
        .with_response(Procedure::IssueCounts, MockResponse::rows(issues_named()))
}

/// Dashboard procedures, in batch order
pub const DASHBOARD_PROCEDURES: [Procedure; 3] = [
    Procedure::CallSummary,
    Procedure::WeekdayCallCounts,
    Procedure::IssueCounts,
];
