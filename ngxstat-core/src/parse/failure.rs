use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes of the offending line kept on a [`ParseFailure`] unless configured otherwise.
pub const DEFAULT_EXCERPT_LIMIT: usize = 256;

/// Why a line could not become a record.
///
/// Every variant is terminal: parsing the same bytes again yields the same reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    EmptyLine,
    LineTooLong,
    MalformedRequestLine,
    InvalidStatusCode,
    InvalidSizeField,
    InvalidTimestamp,
    TruncatedLine,
}

impl FailureReason {
    pub const ALL: [FailureReason; 7] = [
        FailureReason::EmptyLine,
        FailureReason::LineTooLong,
        FailureReason::MalformedRequestLine,
        FailureReason::InvalidStatusCode,
        FailureReason::InvalidSizeField,
        FailureReason::InvalidTimestamp,
        FailureReason::TruncatedLine,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::EmptyLine => "empty-line",
            FailureReason::LineTooLong => "line-too-long",
            FailureReason::MalformedRequestLine => "malformed-request-line",
            FailureReason::InvalidStatusCode => "invalid-status-code",
            FailureReason::InvalidSizeField => "invalid-size-field",
            FailureReason::InvalidTimestamp => "invalid-timestamp",
            FailureReason::TruncatedLine => "truncated-line",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unparseable line, surfaced to the aggregator as a countable event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub line_number: u64,
    /// Leading part of the raw line, cut on a char boundary.
    pub excerpt: String,
    pub excerpt_truncated: bool,
    pub reason: FailureReason,
}

impl ParseFailure {
    pub fn new(line_number: u64, raw: &str, reason: FailureReason, excerpt_limit: usize) -> Self {
        let (excerpt, excerpt_truncated) = excerpt_of(raw, excerpt_limit);

        Self {
            line_number,
            excerpt: excerpt.to_string(),
            excerpt_truncated,
            reason,
        }
    }
}

fn excerpt_of(raw: &str, limit: usize) -> (&str, bool) {
    if raw.len() <= limit {
        return (raw, false);
    }

    let mut end = limit;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    (&raw[..end], true)
}
