use crate::normalize::RecordNormalizer;
use crate::parse::{FailureReason, LineParser, LogFormat, RawLine};
use crate::stats::tests::{line, parse, record};
use crate::stats::{AggregatorSettings, StreamingAggregator};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn settings(top_k: usize, capacity: usize) -> AggregatorSettings {
    AggregatorSettings {
        top_k,
        capacity,
        bucket: Duration::from_secs(60),
        rank_paths_with_query: false,
    }
}

/// 9,000 `200`s and 1,000 `404`s spread over a few clients and minutes.
fn mixed_lines() -> Vec<String> {
    (0..10_000)
        .map(|i| {
            let status = if i % 10 == 0 { 404 } else { 200 };
            let addr = format!("10.0.0.{}", i % 7);
            let time = format!("10/Oct/2023:13:{:02}:00 +0000", i % 5);
            line(&addr, "/", status, &time)
        })
        .collect()
}

//-----------------------------------------------------------------------------
// Counting
//-----------------------------------------------------------------------------

#[test]
fn every_line_is_counted_exactly_once() {
    // Arrange
    let mut agg = StreamingAggregator::default();
    let lines = [
        line("192.0.2.1", "/", 200, "10/Oct/2023:13:55:36 +0000"),
        String::new(),
        "garbage".to_string(),
        line("192.0.2.2", "/a", 404, "10/Oct/2023:13:56:36 +0000"),
    ];

    // Act
    for (i, text) in lines.iter().enumerate() {
        agg.observe(&parse(i as u64 + 1, text));
    }

    // Assert
    let snap = agg.snapshot();
    assert_eq!(snap.lines_seen, 4);
    assert_eq!(snap.parsed + snap.failed, snap.lines_seen);
    assert_eq!(snap.failed, 2);
    assert_eq!(snap.failures_by_reason[&FailureReason::EmptyLine], 1);
    assert_eq!(snap.failures_by_reason[&FailureReason::TruncatedLine], 1);
    assert_eq!(snap.status.values().sum::<u64>(), snap.parsed);
}

#[test]
fn every_failure_reason_is_reported() {
    let snap = StreamingAggregator::default().snapshot();

    assert_eq!(snap.failures_by_reason.len(), FailureReason::ALL.len());
    assert!(snap.failures_by_reason.values().all(|c| *c == 0));
    assert_eq!(snap.requests_per_second(), None);
}

#[test]
fn empty_line_leaves_histogram_untouched() {
    // Arrange
    let mut agg = StreamingAggregator::default();
    agg.observe_record(&record("192.0.2.1", "/", 200));
    let before = agg.snapshot();

    // Act
    agg.observe(&parse(2, ""));

    // Assert
    let after = agg.snapshot();
    assert_eq!(after.failed, before.failed + 1);
    assert_eq!(after.status, before.status);
    assert_eq!(after.top_clients, before.top_clients);
}

#[test]
fn status_histogram_is_order_independent() {
    // Arrange
    let lines = mixed_lines();
    let mut forward = StreamingAggregator::default();
    let mut backward = StreamingAggregator::default();

    // Act
    for (i, text) in lines.iter().enumerate() {
        forward.observe(&parse(i as u64 + 1, text));
    }
    for (i, text) in lines.iter().enumerate().rev() {
        backward.observe(&parse(i as u64 + 1, text));
    }

    // Assert
    let (f, b) = (forward.snapshot(), backward.snapshot());
    assert_eq!(f.status.get(&200), Some(&9_000));
    assert_eq!(f.status.get(&404), Some(&1_000));
    assert_eq!(f.status, b.status);
    assert_eq!(f.buckets, b.buckets);
    assert_eq!(f.first_timestamp, b.first_timestamp);
    assert_eq!(f.last_timestamp, b.last_timestamp);
}

#[test]
fn snapshot_is_idempotent() {
    let mut agg = StreamingAggregator::default();
    agg.observe_record(&record("192.0.2.1", "/", 200));

    assert_eq!(agg.snapshot(), agg.snapshot());
}

#[test]
fn out_of_range_status_is_tallied() {
    let mut agg = StreamingAggregator::default();

    agg.observe_record(&record("192.0.2.1", "/", 99));
    agg.observe_record(&record("192.0.2.1", "/", 200));

    let snap = agg.snapshot();
    assert_eq!(snap.out_of_range_status, 1);
    assert_eq!(snap.status_classes.out_of_range, 1);
}

#[test]
fn filtered_records_count_as_lines_only() {
    // Arrange
    let mut agg = StreamingAggregator::default();
    let r = record("192.0.2.1", "/", 500);

    // Act
    agg.observe_filtered(&r);

    // Assert
    let snap = agg.snapshot();
    assert_eq!(snap.lines_seen, 1);
    assert_eq!(snap.filtered_out, 1);
    assert_eq!(snap.requests(), 0);
    assert!(snap.status.is_empty());
    assert!(snap.buckets.is_empty());
}

//-----------------------------------------------------------------------------
// Rankings
//-----------------------------------------------------------------------------

#[test]
fn paths_rank_without_query_by_default() {
    // Arrange
    let mut agg = StreamingAggregator::new(settings(5, 20));

    // Act
    agg.observe_record(&record("192.0.2.1", "/search?q=a", 200));
    agg.observe_record(&record("192.0.2.1", "/search?q=b", 200));

    // Assert
    let snap = agg.snapshot();
    assert_eq!(snap.top_paths.len(), 1);
    assert_eq!(snap.top_paths[0].key, "/search");
    assert_eq!(snap.top_paths[0].count, 2);
}

#[test]
fn paths_keep_query_when_configured() {
    let mut settings = settings(5, 20);
    settings.rank_paths_with_query = true;
    let mut agg = StreamingAggregator::new(settings);

    agg.observe_record(&record("192.0.2.1", "/search?q=a", 200));
    agg.observe_record(&record("192.0.2.1", "/search?q=b", 200));

    assert_eq!(agg.snapshot().top_paths.len(), 2);
}

#[test]
fn top_clients_are_limited_to_top_k() {
    // Arrange
    let mut agg = StreamingAggregator::new(settings(2, 8));

    // Act
    for addr in ["a", "b", "b", "c", "c", "c"] {
        agg.observe_record(&record(addr, "/", 200));
    }

    // Assert
    let clients: Vec<_> = agg
        .snapshot()
        .top_clients
        .into_iter()
        .map(|e| (e.key, e.count))
        .collect();
    assert_eq!(clients, vec![("c".to_string(), 3), ("b".to_string(), 2)]);
}

#[test]
fn methods_are_ranked() {
    let parser = LineParser::new(LogFormat::Common, RecordNormalizer::default());
    let mut agg = StreamingAggregator::default();

    for (i, method) in ["get", "GET", "post"].iter().enumerate() {
        let text = format!(
            r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "{method} / HTTP/1.1" 200 1"#
        );
        agg.observe(&parser.parse(&RawLine::new(i as u64 + 1, &text)));
    }

    let methods = agg.snapshot().top_methods;
    assert_eq!(methods[0].key, "GET");
    assert_eq!(methods[0].count, 2);
    assert_eq!(methods[1].key, "POST");
}

//-----------------------------------------------------------------------------
// Merge
//-----------------------------------------------------------------------------

#[test]
fn merge_matches_a_single_pass_on_counts() {
    // Arrange
    let lines = mixed_lines();
    let (first, second) = lines.split_at(4_321);
    let mut whole = StreamingAggregator::default();
    let mut left = StreamingAggregator::default();
    let mut right = StreamingAggregator::default();

    for (i, text) in lines.iter().enumerate() {
        whole.observe(&parse(i as u64 + 1, text));
    }
    for (i, text) in first.iter().enumerate() {
        left.observe(&parse(i as u64 + 1, text));
    }
    for (i, text) in second.iter().enumerate() {
        right.observe(&parse(i as u64 + 1, text));
    }

    // Act
    left.merge(right);

    // Assert
    let (w, m) = (whole.snapshot(), left.snapshot());
    assert_eq!(m.lines_seen, w.lines_seen);
    assert_eq!(m.status, w.status);
    assert_eq!(m.buckets, w.buckets);
    assert_eq!(m.bytes_sent, w.bytes_sent);
    assert_eq!(m.first_timestamp, w.first_timestamp);
    assert_eq!(m.last_timestamp, w.last_timestamp);
    assert_eq!(m.top_clients, w.top_clients);
    assert!(m.merged);
    assert!(!w.merged);
    assert!(m.top_k_exact);
}

#[test]
fn merging_an_empty_aggregator_keeps_counts() {
    let mut agg = StreamingAggregator::default();
    agg.observe_record(&record("192.0.2.1", "/", 200));
    let before = agg.snapshot();

    agg.merge(StreamingAggregator::default());

    let after = agg.snapshot();
    assert_eq!(after.status, before.status);
    assert_eq!(after.first_timestamp, before.first_timestamp);
    assert!(after.merged);
}

#[test]
fn latency_summary_needs_upstream_timing() {
    // Arrange
    let parser = LineParser::new(LogFormat::Upstream, RecordNormalizer::default());
    let mut agg = StreamingAggregator::default();
    let text = r#"10.0.0.7 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" "-" 100 0.042 [svc] [] 10.1.2.3:80 1 0.040 200 abc"#;

    // Act
    agg.observe_record(&record("192.0.2.1", "/", 200));
    assert!(agg.snapshot().latency.is_none());
    agg.observe(&parser.parse(&RawLine::new(2, text)));

    // Assert
    let latency = agg.snapshot().latency.expect("latency summary");
    assert_eq!(latency.samples, 1);
    assert_eq!(latency.p50_ms, 50);
}

#[test]
fn many_distinct_methods_make_the_method_ranking_approximate() {
    // Arrange
    let mut agg = StreamingAggregator::default();
    agg.observe_record(&record("192.0.2.1", "/", 200));
    assert!(agg.snapshot().top_methods_exact);

    // Act
    for i in 0..40u64 {
        let text = format!(
            r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "VERB{i} / HTTP/1.1" 200 1 "-" "-""#
        );
        agg.observe(&parse(i + 2, &text));
    }

    // Assert
    let snap = agg.snapshot();
    assert_eq!(snap.parsed, 41);
    assert!(!snap.top_methods_exact);
    assert!(snap.top_k_exact);
}
