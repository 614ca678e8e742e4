use crate::ingest::SourceSummary;
use crate::normalize::LogRecord;
use crate::stats::AggregateSnapshot;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    snapshot: &'a AggregateSnapshot,
    failure_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    requests_per_second: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sources: Vec<SourceSummaryView<'a>>,
}

#[derive(Debug, Serialize)]
struct SourceSummaryView<'a> {
    input: &'a str,
    lines: u64,
    failed: u64,
    completed: bool,
}

/// Pretty-printed JSON document for a snapshot.
pub fn render_json(
    snapshot: &AggregateSnapshot,
    sources: &[SourceSummary],
) -> Result<String, serde_json::Error> {
    let sources: Vec<_> = sources
        .iter()
        .map(|s| SourceSummaryView {
            input: &s.input,
            lines: s.lines,
            failed: s.failed,
            completed: s.completed,
        })
        .collect();

    let report = JsonReport {
        snapshot,
        failure_rate: snapshot.failure_rate(),
        requests_per_second: snapshot.requests_per_second(),
        sources,
    };

    serde_json::to_string_pretty(&report)
}

/// Writes one compact JSON object per record, newline terminated.
pub fn write_record_line<W: Write>(out: &mut W, record: &LogRecord) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")
}
