//! Benchmarks for row-shape normalization and record mapping

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use yacht_data::RawRow;
use yacht_data::mappers::{map_call_records, map_call_summary, map_daily_sentiment};

fn summary_shapes() -> Vec<(&'static str, Value)> {
    vec![
        (
            "named",
            json!([{
                "total_calls": 247, "avg_handle_time": 510, "sentiment_score": 4.8,
                "top_issue": "GPS Issues", "top_issue_count": 45,
                "busiest_agent": "Sarah Johnson", "total_duration": 125_970,
                "percent_positive": 72.5
            }]),
        ),
        (
            "positional",
            json!([[247, 510, 4.8, "GPS Issues", 45, "Sarah Johnson", 125_970, 72.5]]),
        ),
        (
            "composite",
            json!([{
                "f1": 247, "f2": 510, "f3": 4.8, "f4": "GPS Issues", "f5": 45,
                "f6": "Sarah Johnson", "f7": 125_970, "f8": 72.5
            }]),
        ),
    ]
}

fn call_rows(count: usize) -> Value {
    let rows: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "call_id": format!("c-{i:05}"),
                "call_timestamp": "2024-01-15T14:32:00Z",
                "agent_name": "Sarah Johnson",
                "customer_name": "Michael Thompson",
                "duration_seconds": 600 + i,
                "issue_type": "GPS Issues",
                "sentiment": if i % 3 == 0 { "Negative" } else { "Positive" },
                "sentiment_score": "0.5",
                "agent_politeness": 9.1,
                "resolved": i % 2 == 0,
                "transcript": "[{\"role\":\"agent\",\"content\":\"Hello\",\"start_time\":0}]"
            })
        })
        .collect();
    Value::Array(rows)
}

/// Summary mapping over each row shape
fn bench_row_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_shapes");

    for (shape, body) in summary_shapes() {
        group.bench_with_input(BenchmarkId::new("call_summary", shape), &body, |b, body| {
            b.iter(|| map_call_summary(&RawRow::rows_from_response(black_box(body.clone()))));
        });
    }

    let sentiment = json!([
        ["2024-01-09", 65, 10], ["2024-01-10", "70", 10], ["2024-01-11", 68, null]
    ]);
    group.bench_function("daily_sentiment_positional", |b| {
        b.iter(|| map_daily_sentiment(&RawRow::rows_from_response(black_box(sentiment.clone()))));
    });

    group.finish();
}

/// Conversation list mapping at realistic sizes
fn bench_call_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_records");

    for size in [10, 100, 1000] {
        let rows = RawRow::rows_from_response(call_rows(size));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| map_call_records(black_box(rows)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_row_shapes, bench_call_records);
criterion_main!(benches);
