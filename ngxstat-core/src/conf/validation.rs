use crate::conf::AnalyzerConfig;
use crate::normalize::is_valid_pattern;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::time::Duration;

const MAX_TOP_K: usize = 10_000;
const MAX_TRACKING_FACTOR: usize = 64;
const MIN_LINE_LENGTH: usize = 64;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// All problems found in a config, not just the first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_violations(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }

    fn error(&mut self, field: &str, message: String, help: Option<&str>) {
        self.errors.push(ValidationIssue {
            severity: Severity::Error,
            field: field.to_string(),
            message,
            help: help.map(str::to_string),
        });
    }

    fn warning(&mut self, field: &str, message: String, help: Option<&str>) {
        self.warnings.push(ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message,
            help: help.map(str::to_string),
        });
    }

    pub fn render_plain(&self) -> String {
        let mut out = String::new();

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            let severity = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };

            out.push_str(&format!("{}: {}: {}\n", issue.field, severity, issue.message));

            if let Some(help) = &issue.help {
                out.push_str(&format!("  help: {}\n", help));
            }
        }

        out
    }

    pub fn render_pretty(&self) -> String {
        let mut out = String::new();

        if self.has_violations() {
            out.push_str(&format!(
                "configuration validation failed ({} errors, {} warnings)\n\n",
                self.errors.len(),
                self.warnings.len()
            ));
        }

        for issue in self.errors.iter().chain(self.warnings.iter()) {
            match issue.severity {
                Severity::Error => {
                    out.push_str(&format!(
                        "  {} [{}]: {}\n",
                        "error".red().bold(),
                        issue.field,
                        issue.message
                    ));
                }
                Severity::Warning => {
                    out.push_str(&format!(
                        "  {} [{}]: {}\n",
                        "warning".yellow().bold(),
                        issue.field,
                        issue.message
                    ));
                }
            }

            if let Some(help) = &issue.help {
                out.push_str(&format!("    {} {}\n", "help:".cyan(), help));
            }
            out.push('\n');
        }

        out
    }
}

/// Field checks
impl ValidationReport {
    pub fn invalid_top_k(&mut self, top_k: usize) {
        self.error(
            "top_k",
            format!("top_k must be between 1 and {MAX_TOP_K}, got {top_k}"),
            None,
        );
    }

    pub fn invalid_tracking_factor(&mut self, factor: usize) {
        self.error(
            "tracking_factor",
            format!("tracking_factor must be between 1 and {MAX_TRACKING_FACTOR}, got {factor}"),
            None,
        );
    }

    pub fn exact_capacity_tracking(&mut self) {
        self.warning(
            "tracking_factor",
            "tracking_factor = 1 tracks exactly top_k entries; counts become approximate as soon as more distinct keys appear".to_string(),
            Some("A factor of 4 or more keeps rankings stable on busy logs."),
        );
    }

    pub fn invalid_bucket(&mut self, bucket: Duration) {
        self.error(
            "bucket",
            format!(
                "bucket width must be a whole number of seconds, at least 1s, got {}",
                humantime::format_duration(bucket)
            ),
            Some("Examples: \"30s\", \"1m\", \"5m\", \"1h\"."),
        );
    }

    pub fn line_length_too_small(&mut self, max: usize) {
        self.error(
            "max_line_length",
            format!("max_line_length must be at least {MIN_LINE_LENGTH} bytes, got {max}"),
            None,
        );
    }

    pub fn invalid_excerpt_limit(&mut self) {
        self.error(
            "excerpt_limit",
            "excerpt_limit must be greater than zero".to_string(),
            None,
        );
    }

    pub fn no_timestamp_formats(&mut self) {
        self.error(
            "timestamp_formats",
            "at least one timestamp format is required".to_string(),
            Some("The nginx default is \"%d/%b/%Y:%H:%M:%S %z\"."),
        );
    }

    pub fn invalid_timestamp_format(&mut self, pattern: &str) {
        self.error(
            "timestamp_formats",
            format!("invalid timestamp format: {pattern:?}"),
            Some("Use chrono strftime syntax, or the keyword \"rfc3339\"."),
        );
    }

    pub fn duplicate_timestamp_format(&mut self, pattern: &str) {
        self.warning(
            "timestamp_formats",
            format!("duplicate timestamp format: {pattern:?}"),
            None,
        );
    }
}

pub(crate) fn validate(cfg: &AnalyzerConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !(1..=MAX_TOP_K).contains(&cfg.top_k) {
        report.invalid_top_k(cfg.top_k);
    }

    if !(1..=MAX_TRACKING_FACTOR).contains(&cfg.tracking_factor) {
        report.invalid_tracking_factor(cfg.tracking_factor);
    } else if cfg.tracking_factor == 1 {
        report.exact_capacity_tracking();
    }

    if cfg.bucket.as_secs() == 0 || cfg.bucket.subsec_nanos() != 0 {
        report.invalid_bucket(cfg.bucket);
    }

    if cfg.max_line_length < MIN_LINE_LENGTH {
        report.line_length_too_small(cfg.max_line_length);
    }

    if cfg.excerpt_limit == 0 {
        report.invalid_excerpt_limit();
    }

    if cfg.timestamp_formats.is_empty() {
        report.no_timestamp_formats();
    }

    for (i, pattern) in cfg.timestamp_formats.iter().enumerate() {
        if !is_valid_pattern(pattern) {
            report.invalid_timestamp_format(pattern);
        } else if cfg.timestamp_formats[..i].contains(pattern) {
            report.duplicate_timestamp_format(pattern);
        }
    }

    report
}
