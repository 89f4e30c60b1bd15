//! Per-domain record mappers
//!
//! One field table and one mapping function per backend result set. The
//! tables declare positional order and fallback keys; the functions run
//! [`extract`] and apply light domain shaping (clamping, merging, ordering).

use crate::models::RawRow;
use crate::normalize::{Extracted, FieldDefault, FieldSpec, clamp_range, extract};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;
use yacht_core::{
    CallCenterMetrics, CallRecord, CallSummaryMetrics, DailyResolutionEntry, DailySentimentEntry,
    IssueCount, IssueDistributionEntry, Party, QualityScores, SentimentLabel, Transcript,
    Utterance, WeekdayCallCount, utils,
};

use FieldDefault::{Absent, Empty, Unknown, Zero};

/// `get_call_summary`
pub static SUMMARY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("total_calls", &["total_calls", "call_count", "calls"], Zero),
    FieldSpec::new(
        "avg_handle_time",
        &["avg_handle_time", "avg_duration", "average_handle_time"],
        Zero,
    ),
    FieldSpec::new(
        "sentiment_score",
        &["sentiment_score", "avg_sentiment_score", "frequent_sentiment"],
        Zero,
    ),
    FieldSpec::new("top_issue", &["top_issue", "issue_type"], Unknown),
    FieldSpec::new("top_issue_count", &["top_issue_count", "issue_count"], Zero),
    FieldSpec::new("busiest_agent", &["busiest_agent", "agent_name"], Unknown),
    FieldSpec::new(
        "total_duration",
        &["total_duration", "total_duration_seconds"],
        Zero,
    ),
    FieldSpec::new(
        "percent_positive",
        &["percent_positive", "positive_pct", "pct_positive"],
        Zero,
    ),
];

/// `get_weekday_call_counts`
pub static WEEKDAY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("day", &["day", "weekday", "day_of_week", "dow"], Empty),
    FieldSpec::new("calls", &["calls", "call_count", "count", "total_calls"], Zero),
];

/// `get_issue_counts`
pub static ISSUE_COUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("issue", &["issue", "issue_type", "name", "type"], Unknown),
    FieldSpec::new("count", &["count", "call_count", "calls", "value"], Zero),
];

/// `get_issue_distribution`
pub static DISTRIBUTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("issue", &["issue", "issue_type", "name", "type"], Unknown),
    FieldSpec::new(
        "percentage",
        &["percentage", "pct", "percent", "value", "count"],
        Zero,
    ),
];

/// `get_daily_resolution_status`
pub static RESOLUTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("date", &["date", "date_id", "day"], Absent),
    FieldSpec::new(
        "resolved",
        &["resolved", "resolved_count", "resolved_calls"],
        Zero,
    ),
    FieldSpec::new(
        "escalated",
        &["escalated", "escalated_count", "escalated_calls"],
        Zero,
    ),
];

/// `get_daily_sentiment_pct`
pub static SENTIMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("date", &["date", "date_id", "day"], Absent),
    FieldSpec::new(
        "positive_pct",
        &["positive_pct", "positive", "pct_positive", "positive_percentage"],
        Zero,
    ),
    FieldSpec::new(
        "negative_pct",
        &["negative_pct", "negative", "pct_negative", "negative_percentage"],
        Zero,
    ),
];

/// `get_call_center_metrics`
pub static CENTER_METRICS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("total_calls", &["total_calls", "call_count"], Zero),
    FieldSpec::new(
        "avg_duration",
        &["avg_duration", "avg_handle_time", "average_duration"],
        Zero,
    ),
    FieldSpec::new(
        "resolution_rate",
        &["resolution_rate", "resolved_pct", "resolution_pct"],
        Zero,
    ),
    FieldSpec::new(
        "avg_sentiment_score",
        &["avg_sentiment_score", "sentiment_score"],
        Zero,
    ),
    FieldSpec::new("avg_politeness", &["avg_politeness", "politeness"], Zero),
    FieldSpec::new(
        "avg_professionalism",
        &["avg_professionalism", "professionalism"],
        Zero,
    ),
    FieldSpec::new(
        "avg_process_adherence",
        &["avg_process_adherence", "process_adherence"],
        Zero,
    ),
];

/// `get_call_data` and `get_recent_call`
pub static CALL_RECORD_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("call_id", &["call_id", "id", "vcon_id", "uuid"], Empty),
    FieldSpec::new("date_id", &["date_id", "date"], Absent),
    FieldSpec::new("agent_name", &["agent_name", "agent.name", "agent"], Unknown),
    FieldSpec::new(
        "agent_email",
        &["agent_email", "agent.contact", "agent_contact", "agent_phone"],
        Empty,
    ),
    FieldSpec::new(
        "customer_name",
        &["customer_name", "customer.name", "customer"],
        Unknown,
    ),
    FieldSpec::new(
        "customer_email",
        &[
            "customer_email",
            "customer.contact",
            "customer_contact",
            "customer_phone",
        ],
        Empty,
    ),
    FieldSpec::new("duration_seconds", &["duration_seconds", "duration"], Zero),
    FieldSpec::new(
        "call_timestamp",
        &["call_timestamp", "timestamp", "created_at"],
        Absent,
    ),
    FieldSpec::new("audio_url", &["audio_url", "recording_url"], Absent),
    FieldSpec::new("sentiment", &["sentiment", "sentiment_label"], Empty),
    FieldSpec::new("issue_type", &["issue_type", "issue", "type"], Unknown),
    FieldSpec::new("resolved", &["resolved", "is_resolved"], Absent),
    FieldSpec::new("sentiment_score", &["sentiment_score"], Zero),
    FieldSpec::new(
        "agent_politeness",
        &["agent_politeness", "quality.politeness", "politeness"],
        Absent,
    ),
    FieldSpec::new(
        "agent_professionalism",
        &[
            "agent_professionalism",
            "quality.professionalism",
            "professionalism",
        ],
        Absent,
    ),
    FieldSpec::new(
        "process_adherence",
        &["process_adherence", "quality.process_adherence"],
        Absent,
    ),
    FieldSpec::new("transcript", &["transcript", "transcription"], Empty),
    FieldSpec::new("summary", &["summary"], Empty),
    FieldSpec::new("disposition", &["disposition", "call_disposition"], Empty),
];

const QUALITY_MAX: f64 = 10.0;

fn map_each<T>(
    rows: &[RawRow],
    table: &'static [FieldSpec],
    map: impl Fn(&Extracted<'_>) -> T,
) -> Vec<T> {
    rows.iter().map(|row| map(&extract(row, table))).collect()
}

/// Summary metrics from the first row; no rows yields all defaults
pub fn map_call_summary(rows: &[RawRow]) -> CallSummaryMetrics {
    let Some(row) = rows.first() else {
        debug!("empty call summary result");
        return summary_defaults();
    };
    let fields = extract(row, SUMMARY_FIELDS);

    let total_calls = fields.count("total_calls");
    CallSummaryMetrics {
        total_calls,
        avg_handle_time: fields.number("avg_handle_time").max(0.0),
        sentiment_score: fields.number("sentiment_score"),
        top_issue: fields.text("top_issue"),
        top_issue_count: fields.count("top_issue_count").min(total_calls),
        busiest_agent: fields.text("busiest_agent"),
        total_duration: fields.number("total_duration").max(0.0),
        percent_positive: clamp_range(fields.number("percent_positive"), 0.0, 100.0),
    }
}

fn summary_defaults() -> CallSummaryMetrics {
    CallSummaryMetrics {
        top_issue: "Unknown".to_string(),
        busiest_agent: "Unknown".to_string(),
        ..CallSummaryMetrics::default()
    }
}

/// Calls per weekday, Monday first.
///
/// Recognised spellings collapse to `Mon`..`Sun`; anything else keeps its
/// text and sorts last.
pub fn map_weekday_counts(rows: &[RawRow]) -> Vec<WeekdayCallCount> {
    let mut counts = map_each(rows, WEEKDAY_FIELDS, |fields| {
        let raw = fields.text("day");
        let day = utils::short_weekday(&raw).map_or(raw, str::to_string);
        WeekdayCallCount {
            day,
            calls: fields.count("calls"),
        }
    });
    counts.sort_by_key(|entry| utils::weekday_order(&entry.day));
    counts
}

/// Calls per issue, largest first
pub fn map_issue_counts(rows: &[RawRow]) -> Vec<IssueCount> {
    let mut counts = map_each(rows, ISSUE_COUNT_FIELDS, |fields| IssueCount {
        issue: fields.text("issue"),
        count: fields.count("count"),
    });
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Issue shares summing to 100.
///
/// Duplicate labels merge by summing, in first-seen order. A set whose
/// total strays more than one point from 100 (raw counts, usually) is
/// rescaled proportionally.
pub fn map_issue_distribution(rows: &[RawRow]) -> Vec<IssueDistributionEntry> {
    let mut merged: Vec<IssueDistributionEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for fields in rows.iter().map(|row| extract(row, DISTRIBUTION_FIELDS)) {
        let issue = fields.text("issue");
        let share = fields.number("percentage").max(0.0);
        match positions.get(&issue) {
            Some(&pos) => {
                if let Some(entry) = merged.get_mut(pos) {
                    entry.percentage += share;
                }
            }
            None => {
                positions.insert(issue.clone(), merged.len());
                merged.push(IssueDistributionEntry {
                    issue,
                    percentage: share,
                });
            }
        }
    }

    let total: f64 = merged.iter().map(|entry| entry.percentage).sum();
    if total > 0.0 && (total - 100.0).abs() > 1.0 {
        debug!(total, "rescaling issue distribution to 100");
        for entry in &mut merged {
            entry.percentage = entry.percentage * 100.0 / total;
        }
    }
    for entry in &mut merged {
        entry.percentage = clamp_range(entry.percentage, 0.0, 100.0);
    }
    merged
}

/// Resolved and escalated counts per day, oldest first; undated rows last
pub fn map_daily_resolution(rows: &[RawRow]) -> Vec<DailyResolutionEntry> {
    let mut entries = map_each(rows, RESOLUTION_FIELDS, |fields| DailyResolutionEntry {
        date: fields.date("date"),
        resolved: fields.count("resolved"),
        escalated: fields.count("escalated"),
    });
    entries.sort_by_key(|entry| (entry.date.is_none(), entry.date));
    entries
}

/// Sentiment split per day, oldest first; undated rows last
pub fn map_daily_sentiment(rows: &[RawRow]) -> Vec<DailySentimentEntry> {
    let mut entries = map_each(rows, SENTIMENT_FIELDS, |fields| DailySentimentEntry {
        date: fields.date("date"),
        positive_pct: clamp_range(fields.number("positive_pct"), 0.0, 100.0),
        negative_pct: clamp_range(fields.number("negative_pct"), 0.0, 100.0),
    });
    entries.sort_by_key(|entry| (entry.date.is_none(), entry.date));
    entries
}

/// Aggregate metrics from the first row
pub fn map_call_center_metrics(rows: &[RawRow]) -> CallCenterMetrics {
    let Some(row) = rows.first() else {
        debug!("empty call center metrics result");
        return CallCenterMetrics::default();
    };
    let fields = extract(row, CENTER_METRICS_FIELDS);
    let quality = |name: &str| clamp_range(fields.number(name), 0.0, QUALITY_MAX);

    CallCenterMetrics {
        total_calls: fields.count("total_calls"),
        avg_duration: fields.number("avg_duration").max(0.0),
        resolution_rate: clamp_range(fields.number("resolution_rate"), 0.0, 100.0),
        avg_sentiment_score: fields.number("avg_sentiment_score"),
        avg_politeness: quality("avg_politeness"),
        avg_professionalism: quality("avg_professionalism"),
        avg_process_adherence: quality("avg_process_adherence"),
    }
}

/// One call record
pub fn map_call_record(row: &RawRow) -> CallRecord {
    let fields = extract(row, CALL_RECORD_FIELDS);
    let quality = |name: &str| {
        fields
            .opt_number(name)
            .map(|score| clamp_range(score, 0.0, QUALITY_MAX))
    };
    let call_timestamp = fields.timestamp("call_timestamp");

    CallRecord {
        call_id: fields.text("call_id"),
        call_timestamp,
        date_id: fields
            .date("date_id")
            .or_else(|| call_timestamp.map(|ts| ts.date_naive())),
        agent: Party {
            name: fields.text("agent_name"),
            contact: fields.text("agent_email"),
        },
        customer: Party {
            name: fields.text("customer_name"),
            contact: fields.text("customer_email"),
        },
        duration_seconds: fields.number("duration_seconds").max(0.0),
        issue_type: fields.text("issue_type"),
        sentiment: SentimentLabel::parse_lenient(&fields.text("sentiment")),
        sentiment_score: fields.number("sentiment_score"),
        quality: QualityScores {
            politeness: quality("agent_politeness"),
            professionalism: quality("agent_professionalism"),
            process_adherence: quality("process_adherence"),
        },
        resolved: fields.flag("resolved"),
        disposition: fields.text("disposition"),
        audio_url: fields.opt_text("audio_url"),
        summary: fields.text("summary"),
        transcript: fields.raw("transcript").map(parse_transcript).unwrap_or_default(),
    }
}

/// Call list, backend order preserved
pub fn map_call_records(rows: &[RawRow]) -> Vec<CallRecord> {
    rows.iter().map(map_call_record).collect()
}

/// Interpret a transcript field.
///
/// A JSON array of utterances (inline or JSON-encoded in a string) becomes
/// structured turns. An object wrapping a `transcript` field is unwrapped.
/// Everything else is shown as one plain block.
pub fn parse_transcript(value: &Value) -> Transcript {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner @ (Value::Array(_) | Value::Object(_))) => match parse_transcript(&inner) {
                Transcript::Plain(_) => Transcript::Plain(text.clone()),
                structured => structured,
            },
            _ => Transcript::Plain(text.clone()),
        },
        Value::Array(_) => serde_json::from_value::<Vec<Utterance>>(value.clone())
            .map_or_else(
                |err| {
                    debug!(%err, "transcript array is not a list of utterances");
                    Transcript::Plain(value.to_string())
                },
                Transcript::Utterances,
            ),
        Value::Object(map) => map
            .get("transcript")
            .filter(|inner| !inner.is_object())
            .map_or_else(|| Transcript::Plain(value.to_string()), parse_transcript),
        Value::Null => Transcript::default(),
        other => Transcript::Plain(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn rows(value: Value) -> Vec<RawRow> {
        RawRow::rows_from_response(value)
    }

    #[rstest]
    #[case(json!([[247, 510.5, 0.8, "GPS Issues", 45, "Sarah Johnson", 126_000.0, 68.0]]))]
    #[case(json!([{"f1": 247, "f2": 510.5, "f3": 0.8, "f4": "GPS Issues", "f5": 45,
                   "f6": "Sarah Johnson", "f7": 126_000.0, "f8": 68.0}]))]
    #[case(json!({"total_calls": 247, "avg_handle_time": 510.5, "sentiment_score": 0.8,
                  "top_issue": "GPS Issues", "top_issue_count": 45,
                  "busiest_agent": "Sarah Johnson", "total_duration": 126_000.0,
                  "percent_positive": 68.0}))]
    #[case(json!([{"call_count": "247", "avg_duration": "510.5", "frequent_sentiment": 0.8,
                   "issue_type": "GPS Issues", "issue_count": 45, "agent_name": "Sarah Johnson",
                   "total_duration_seconds": 126_000, "positive_pct": "68"}]))]
    fn test_summary_shapes_are_equivalent(#[case] input: Value) {
        let summary = map_call_summary(&rows(input));
        assert_eq!(
            summary,
            CallSummaryMetrics {
                total_calls: 247,
                avg_handle_time: 510.5,
                sentiment_score: 0.8,
                top_issue: "GPS Issues".to_string(),
                top_issue_count: 45,
                busiest_agent: "Sarah Johnson".to_string(),
                total_duration: 126_000.0,
                percent_positive: 68.0,
            }
        );
    }

    #[test]
    fn test_summary_defaults_when_missing() {
        let summary = map_call_summary(&rows(json!([{}])));
        assert_eq!(summary.total_calls, 0);
        assert_eq!(summary.top_issue, "Unknown");
        assert_eq!(summary.busiest_agent, "Unknown");
        assert_eq!(summary, map_call_summary(&[]));
    }

    #[test]
    fn test_summary_issue_count_never_exceeds_total() {
        let summary = map_call_summary(&rows(json!([[10, 0, 0, "GPS", 99]])));
        assert_eq!(summary.total_calls, 10);
        assert_eq!(summary.top_issue_count, 10);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let first = map_call_summary(&rows(json!([[247, 510.5, 0.8, "GPS", 45, "Lisa Kim"]])));
        let again = map_call_summary(&rows(serde_json::to_value(&first).unwrap()));
        assert_eq!(first, again);
    }

    #[test]
    fn test_weekday_counts_normalised_and_ordered() {
        let counts = map_weekday_counts(&rows(json!([
            {"day": "Sunday", "calls": 3},
            ["Wednesday", 12],
            {"f1": "monday", "f2": "9"},
            {"dow": 2, "count": 7}
        ])));

        let days: Vec<_> = counts.iter().map(|c| (c.day.as_str(), c.calls)).collect();
        assert_eq!(
            days,
            vec![("Mon", 9), ("Tue", 7), ("Wed", 12), ("Sun", 3)]
        );
    }

    #[test]
    fn test_issue_counts_sorted_descending() {
        let counts = map_issue_counts(&rows(json!([
            ["Navigation", 32],
            ["GPS Issues", 45],
            {"issue_type": "Engine Support", "call_count": 38}
        ])));

        let issues: Vec<_> = counts.iter().map(|c| c.issue.as_str()).collect();
        assert_eq!(issues, vec!["GPS Issues", "Engine Support", "Navigation"]);
    }

    #[test]
    fn test_distribution_merges_duplicates() {
        let entries = map_issue_distribution(&rows(json!([
            ["GPS Issues", 30],
            ["Engine Support", 50],
            ["GPS Issues", 20]
        ])));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].issue, "GPS Issues");
        assert_eq!(entries[0].percentage, 50.0);
        assert_eq!(entries[1].percentage, 50.0);
    }

    #[test]
    fn test_distribution_rescales_raw_counts() {
        let entries = map_issue_distribution(&rows(json!([
            {"name": "GPS", "value": 3},
            {"name": "Engine", "value": 1}
        ])));

        assert_eq!(entries[0].percentage, 75.0);
        assert_eq!(entries[1].percentage, 25.0);
    }

    #[test]
    fn test_distribution_keeps_near_hundred_sets() {
        let entries = map_issue_distribution(&rows(json!([["A", 33.3], ["B", 33.3], ["C", 33.3]])));
        assert_eq!(entries[0].percentage, 33.3);
    }

    #[test]
    fn test_daily_resolution_sorted_by_date() {
        let entries = map_daily_resolution(&rows(json!([
            ["2024-01-03", 5, 1],
            {"date": "2024-01-01T00:00:00Z", "resolved_count": 8, "escalated_count": 2},
            {"resolved": 1}
        ])));

        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(entries[0].resolved, 8);
        assert_eq!(entries[1].escalated, 1);
        assert_eq!(entries[2].date, None);
    }

    #[rstest]
    #[case(70.0, 20.0, 10.0)]
    #[case(90.0, 20.0, 0.0)]
    fn test_daily_sentiment_neutral(#[case] pos: f64, #[case] neg: f64, #[case] neutral: f64) {
        let entries = map_daily_sentiment(&rows(json!([["2024-01-01", pos, neg]])));
        assert_eq!(entries[0].neutral_pct(), neutral);
    }

    #[test]
    fn test_center_metrics_clamps_quality() {
        let metrics = map_call_center_metrics(&rows(json!([{
            "total_calls": 120, "avg_duration": 402.0, "resolution_rate": 140,
            "avg_sentiment_score": 0.4, "avg_politeness": 12.5,
            "avg_professionalism": 8.1, "avg_process_adherence": -1
        }])));

        assert_eq!(metrics.resolution_rate, 100.0);
        assert_eq!(metrics.avg_politeness, 10.0);
        assert_eq!(metrics.avg_professionalism, 8.1);
        assert_eq!(metrics.avg_process_adherence, 0.0);
    }

    fn positional_call() -> Value {
        json!([
            "c-001", "2024-01-15", "Sarah Johnson", "sarah@yachtsupport.io",
            "John Smith", "+1-555-0100", 754, "2024-01-15T14:32:00Z",
            "https://cdn.example/c-001.wav", "Positive", "GPS Issues", "yes",
            0.82, 9.0, 8.5, 7.0,
            "[{\"role\":\"agent\",\"content\":\"Hello\",\"start_time\":0}]",
            "Calibrated GPS", "resolved"
        ])
    }

    #[test]
    fn test_call_record_from_positional_row() {
        let call = map_call_record(&RawRow::classify(positional_call()));

        assert_eq!(call.call_id, "c-001");
        assert_eq!(call.agent.name, "Sarah Johnson");
        assert_eq!(call.customer.contact, "+1-555-0100");
        assert_eq!(call.duration_seconds, 754.0);
        assert_eq!(call.sentiment, SentimentLabel::Positive);
        assert_eq!(call.resolved, Some(true));
        assert_eq!(call.quality.professionalism, Some(8.5));
        assert!(matches!(call.transcript, Transcript::Utterances(ref t) if t.len() == 1));
    }

    #[test]
    fn test_call_record_nested_named_row() {
        let call = map_call_record(&RawRow::classify(json!({
            "id": "c-002",
            "agent": {"name": "Mike Rodriguez", "contact": "mike@yachtsupport.io"},
            "customer": "Emma Wilson",
            "duration": "612",
            "timestamp": "2024-01-15 13:15:00+00",
            "sentiment": "mixed",
            "quality": {"politeness": 14}
        })));

        assert_eq!(call.call_id, "c-002");
        assert_eq!(call.agent.contact, "mike@yachtsupport.io");
        assert_eq!(call.customer.name, "Emma Wilson");
        assert_eq!(call.sentiment, SentimentLabel::Unknown);
        assert_eq!(call.quality.politeness, Some(10.0));
        assert_eq!(call.quality.process_adherence, None);
        assert_eq!(call.date_id, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(call.resolved, None);
        assert!(call.transcript.is_empty());
    }

    #[test]
    fn test_call_record_is_idempotent() {
        let first = map_call_record(&RawRow::classify(positional_call()));
        let again = map_call_record(&RawRow::classify(serde_json::to_value(&first).unwrap()));
        assert_eq!(first, again);
    }

    #[test]
    fn test_call_records_keep_backend_order() {
        let calls = map_call_records(&rows(json!([{"call_id": "b"}, {"call_id": "a"}])));
        let ids: Vec<_> = calls.iter().map(|c| c.call_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_transcript_json_string_yields_utterance() {
        let transcript =
            parse_transcript(&json!(r#"[{"role":"customer","content":"hi","start_time":0}]"#));
        assert_eq!(
            transcript,
            Transcript::Utterances(vec![Utterance {
                role: "customer".to_string(),
                content: "hi".to_string(),
                start_time: 0.0,
            }])
        );
    }

    #[rstest]
    #[case(json!("plain text"), "plain text")]
    #[case(json!("[not json"), "[not json")]
    #[case(json!("{\"speaker\": 1}"), "{\"speaker\": 1}")]
    #[case(json!(42), "42")]
    fn test_transcript_falls_back_to_plain(#[case] input: Value, #[case] expected: &str) {
        assert_eq!(
            parse_transcript(&input),
            Transcript::Plain(expected.to_string())
        );
    }

    #[test]
    fn test_transcript_unwraps_wrapper_object() {
        let transcript = parse_transcript(&json!({
            "transcript": [{"speaker": "agent", "text": "Hello", "start": 1.5}]
        }));
        assert!(matches!(transcript, Transcript::Utterances(ref t) if t[0].start_time == 1.5));
    }

    proptest! {
        #[test]
        fn prop_summary_issue_count_bounded(total in -10i64..10_000, issue in -10i64..20_000) {
            let summary = map_call_summary(&rows(json!([[total, 0, 0, "X", issue]])));
            prop_assert!(summary.top_issue_count <= summary.total_calls);
        }

        #[test]
        fn prop_neutral_never_negative(pos in -50.0f64..200.0, neg in -50.0f64..200.0) {
            let entries = map_daily_sentiment(&rows(json!([["2024-01-01", pos, neg]])));
            prop_assert!(entries[0].neutral_pct() >= 0.0);
        }

        #[test]
        fn prop_transcript_parse_never_panics(s in ".*") {
            let _ = parse_transcript(&Value::String(s));
        }
    }
}
