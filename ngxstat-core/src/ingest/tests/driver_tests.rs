use crate::conf::AnalyzerConfig;
use crate::ingest::{IngestDriver, InputSource, RecordFilter};
use crate::parse::FailureReason;
use crate::stats::StreamingAggregator;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tempfile::tempdir;

const GOOD: &str = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 612 "-" "Mozilla/5.0""#;
const NOT_FOUND: &str = r#"192.0.2.9 - - [10/Oct/2023:13:57:02 +0000] "GET /missing HTTP/1.1" 404 0 "-" "curl/8.0""#;

fn write_log(dir: &Path, name: &str, lines: &[&str]) -> InputSource {
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    InputSource::File(path)
}

//-----------------------------------------------------------------------------
// Streaming
//-----------------------------------------------------------------------------

#[test]
fn stream_yields_one_outcome_per_line_in_order() {
    // Arrange
    let driver = IngestDriver::new(&AnalyzerConfig::default());
    let input = format!("{GOOD}\n\n{NOT_FOUND}\n");
    let mut seen = Vec::new();

    // Act
    let end = driver
        .stream("mem", Cursor::new(input), |outcome| {
            seen.push(match outcome {
                Ok(r) => Ok(r.line_number),
                Err(f) => Err((f.line_number, f.reason)),
            });
            ControlFlow::Continue(())
        })
        .unwrap();

    // Assert
    assert_eq!(
        seen,
        vec![Ok(1), Err((2, FailureReason::EmptyLine)), Ok(3)]
    );
    assert_eq!(end.lines, 3);
    assert!(!end.stopped);
}

#[test]
fn length_limit_counts_source_bytes_not_decoded_text() {
    // Arrange
    let mut line = GOOD.replace("Mozilla/5.0", "").into_bytes();
    let quote = line.len() - 1;
    line.splice(quote..quote, [0xffu8; 10]);
    let cfg = AnalyzerConfig {
        max_line_length: line.len(),
        ..AnalyzerConfig::default()
    };
    let driver = IngestDriver::new(&cfg);
    let mut reasons = Vec::new();

    // Act
    driver
        .stream("mem", Cursor::new(line), |outcome| {
            reasons.push(outcome.err().map(|f| f.reason));
            ControlFlow::Continue(())
        })
        .unwrap();

    // Assert
    assert_eq!(reasons, vec![None]);
}

#[test]
fn sink_can_stop_the_stream() {
    let driver = IngestDriver::new(&AnalyzerConfig::default());
    let input = [GOOD; 5].join("\n");
    let mut count = 0;

    let end = driver
        .stream("mem", Cursor::new(input), |_| {
            count += 1;
            if count == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(end.lines, 2);
    assert!(end.stopped);
}

#[test]
fn overlong_lines_are_failures_not_errors() {
    // Arrange
    let cfg = AnalyzerConfig {
        max_line_length: 128,
        ..AnalyzerConfig::default()
    };
    let driver = IngestDriver::new(&cfg);
    let input = format!("{}\n{GOOD}\n", "x".repeat(100_000));
    let mut agg = StreamingAggregator::from_config(&cfg);

    // Act
    driver.aggregate("mem", Cursor::new(input), &mut agg).unwrap();

    // Assert
    let snap = agg.snapshot();
    assert_eq!(snap.parsed, 1);
    assert_eq!(snap.failures_by_reason[&FailureReason::LineTooLong], 1);
}

#[test]
fn filter_excludes_records_from_aggregates() {
    let driver = IngestDriver::new(&AnalyzerConfig::default())
        .with_filter(RecordFilter::new(Some("404"), None, None));
    let mut agg = StreamingAggregator::default();

    driver
        .aggregate("mem", Cursor::new(format!("{GOOD}\n{NOT_FOUND}")), &mut agg)
        .unwrap();

    let snap = agg.snapshot();
    assert_eq!(snap.filtered_out, 1);
    assert_eq!(snap.status.keys().copied().collect::<Vec<_>>(), vec![404]);
}

//-----------------------------------------------------------------------------
// Runs over files
//-----------------------------------------------------------------------------

#[test]
fn missing_input_does_not_stop_the_others() {
    // Arrange
    let dir = tempdir().unwrap();
    let sources = vec![
        write_log(dir.path(), "a.log", &[GOOD, NOT_FOUND]),
        InputSource::File(dir.path().join("missing.log")),
        write_log(dir.path(), "b.log", &[GOOD]),
    ];

    // Act
    let report = IngestDriver::new(&AnalyzerConfig::default()).run(&sources);

    // Assert
    assert_eq!(report.snapshot.parsed, 3);
    assert_eq!(report.errors.len(), 1);
    assert!(report.has_io_errors());
    assert_eq!(report.sources.len(), 3);
    assert!(report.sources[0].completed);
    assert!(!report.sources[1].completed);
    assert_eq!(report.sources[2].lines, 1);
    assert!(!report.cancelled);
}

#[test]
fn parallel_run_matches_sequential_counts() {
    // Arrange
    let dir = tempdir().unwrap();
    let sources: Vec<_> = (0..4)
        .map(|i| {
            let lines: Vec<&str> = (0..50)
                .map(|j| if (i + j) % 3 == 0 { NOT_FOUND } else { GOOD })
                .chain(["broken line"])
                .collect();
            write_log(dir.path(), &format!("{i}.log"), &lines)
        })
        .collect();
    let cfg = AnalyzerConfig::default();

    // Act
    let sequential = IngestDriver::new(&cfg).run(&sources);
    let parallel = IngestDriver::new(&cfg).with_parallel(true).run(&sources);

    // Assert
    let (s, p) = (&sequential.snapshot, &parallel.snapshot);
    assert_eq!(p.lines_seen, s.lines_seen);
    assert_eq!(p.failed, 4);
    assert_eq!(p.status, s.status);
    assert_eq!(p.buckets, s.buckets);
    assert_eq!(p.top_clients, s.top_clients);
    assert_eq!(parallel.sources, sequential.sources);
    assert!(p.merged);
}

#[test]
fn cancelled_run_still_reports() {
    // Arrange
    let dir = tempdir().unwrap();
    let sources = vec![write_log(dir.path(), "a.log", &[GOOD, GOOD])];
    let cancel = Arc::new(AtomicBool::new(true));

    // Act
    let report = IngestDriver::new(&AnalyzerConfig::default())
        .with_cancel(cancel)
        .run(&sources);

    // Assert
    assert!(report.cancelled);
    assert_eq!(report.snapshot.lines_seen, 0);
    assert!(report.errors.is_empty());
}
