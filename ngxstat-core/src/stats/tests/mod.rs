mod aggregator_tests;
mod status_tests;

use crate::normalize::{LogRecord, RecordNormalizer};
use crate::parse::{LineParser, LogFormat, ParseOutcome, RawLine};

/// A combined-format line for `addr` requesting `path` at `time` (nginx `$time_local`).
pub(super) fn line(addr: &str, path: &str, status: u16, time: &str) -> String {
    format!(r#"{addr} - - [{time}] "GET {path} HTTP/1.1" {status:03} 100 "-" "-""#)
}

pub(super) fn parse(number: u64, text: &str) -> ParseOutcome {
    LineParser::new(LogFormat::Combined, RecordNormalizer::default())
        .parse(&RawLine::new(number, text))
}

pub(super) fn record(addr: &str, path: &str, status: u16) -> LogRecord {
    parse(1, &line(addr, path, status, "10/Oct/2023:13:55:36 +0000")).unwrap()
}
