use crate::conf::AnalyzerConfig;
use crate::normalize::{LogRecord, RecordNormalizer, TimestampPattern};
use crate::parse::{DEFAULT_EXCERPT_LIMIT, FailureReason, LogFormat, ParseFailure, RawLine};

pub const DEFAULT_MAX_LINE_LENGTH: usize = 16 * 1024;

/// Exactly one of these comes out of every line.
pub type ParseOutcome = Result<LogRecord, ParseFailure>;

#[derive(Debug, Clone)]
pub struct LineParser {
    format: LogFormat,
    max_line_length: usize,
    excerpt_limit: usize,
    normalizer: RecordNormalizer,
}

impl LineParser {
    pub fn new(format: LogFormat, normalizer: RecordNormalizer) -> Self {
        Self {
            format,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
            normalizer,
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(cfg.format, RecordNormalizer::from_config(cfg))
            .with_max_line_length(cfg.max_line_length)
            .with_excerpt_limit(cfg.excerpt_limit)
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub fn with_excerpt_limit(mut self, excerpt_limit: usize) -> Self {
        self.excerpt_limit = excerpt_limit;
        self
    }

    pub fn timestamp_pattern(&self) -> &TimestampPattern {
        self.normalizer.timestamps().primary()
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn parse(&self, line: &RawLine<'_>) -> ParseOutcome {
        let text = line.text.trim_end_matches(['\r', '\n']);

        if text.trim().is_empty() {
            return Err(self.fail(line, FailureReason::EmptyLine));
        }

        // Checked before tokenizing so a pathological line costs O(1).
        if line.raw_len > self.max_line_length {
            return Err(self.fail(line, FailureReason::LineTooLong));
        }

        let fields = self
            .format
            .tokenize(text)
            .map_err(|reason| self.fail(line, reason))?;

        self.normalizer
            .normalize(line.number, fields)
            .map_err(|reason| self.fail(line, reason))
    }

    fn fail(&self, line: &RawLine<'_>, reason: FailureReason) -> ParseFailure {
        ParseFailure::new(line.number, line.text, reason, self.excerpt_limit)
    }
}
