mod format_tests;

use crate::normalize::RecordNormalizer;
use crate::parse::{LineParser, LogFormat, ParseOutcome, RawLine};

pub(super) const EXAMPLE_LINE: &str = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 612 "-" "Mozilla/5.0""#;

pub(super) fn parse_with(format: LogFormat, text: &str) -> ParseOutcome {
    LineParser::new(format, RecordNormalizer::default()).parse(&RawLine::new(1, text))
}

pub(super) fn parse_combined(text: &str) -> ParseOutcome {
    parse_with(LogFormat::Combined, text)
}
