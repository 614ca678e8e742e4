
use crate::normalize::RecordNormalizer;
use crate::parse::{LineParser, LogFormat, RawLine};
use crate::stats::{AggregateSnapshot, StreamingAggregator};

pub(super) const LINES: [&str; 4] = [
    r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 612 "-" "Mozilla/5.0""#,
    r#"192.0.2.1 - - [10/Oct/2023:13:56:01 +0000] "GET /about HTTP/1.1" 200 100 "-" "Mozilla/5.0""#,
    r#"198.51.100.4 - - [10/Oct/2023:13:57:12 +0000] "POST /login HTTP/1.1" 503 0 "-" "curl/8.0""#,
    "this is not a log line",
];

pub(super) fn snapshot() -> AggregateSnapshot {
    let parser = LineParser::new(LogFormat::Combined, RecordNormalizer::default());
    let mut agg = StreamingAggregator::default();
    for (i, text) in LINES.iter().enumerate() {
        agg.observe(&parser.parse(&RawLine::new(i as u64 + 1, text)));
    }
    agg.into_snapshot()
}
