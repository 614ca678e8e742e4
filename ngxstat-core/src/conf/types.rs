use crate::normalize::{NGINX_TIME_LOCAL, StatusPolicy};
use crate::parse::{DEFAULT_EXCERPT_LIMIT, DEFAULT_MAX_LINE_LENGTH, LogFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything one analysis run is parameterized by.
///
/// Every field has a default, so an empty file (or no file) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Line grammar: `common`, `combined` or `upstream`.
    pub format: LogFormat,

    /// Tried in order; the first pattern that matches wins.
    pub timestamp_formats: Vec<String>,

    /// Longer lines are rejected as `line-too-long` before tokenizing.
    pub max_line_length: usize,

    /// Bytes of a failed line kept for diagnostics.
    pub excerpt_limit: usize,

    /// Number of addresses / paths reported.
    pub top_k: usize,

    /// Slots tracked per reported entry. Higher is more accurate under
    /// high cardinality and costs proportionally more memory.
    pub tracking_factor: usize,

    /// Width of the request-rate buckets, e.g. `"1m"`, `"5m"`, `"1h"`.
    #[serde(with = "humantime_serde")]
    pub bucket: Duration,

    pub out_of_range_status: StatusPolicy,

    /// Rank `/search?q=a` and `/search?q=b` separately.
    pub rank_paths_with_query: bool,

    /// Any parse failure makes the run exit non-zero (after processing everything).
    pub strict: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            timestamp_formats: vec![NGINX_TIME_LOCAL.to_string()],
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            excerpt_limit: DEFAULT_EXCERPT_LIMIT,
            top_k: 10,
            tracking_factor: 4,
            bucket: Duration::from_secs(60),
            out_of_range_status: StatusPolicy::default(),
            rank_paths_with_query: false,
            strict: false,
        }
    }
}

impl AnalyzerConfig {
    /// Capacity of each top-K tracker.
    pub fn top_k_capacity(&self) -> usize {
        self.top_k.saturating_mul(self.tracking_factor.max(1))
    }

    pub fn bucket_secs(&self) -> i64 {
        self.bucket.as_secs().max(1) as i64
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(top_k) = overrides.top_k {
            self.top_k = top_k;
        }
        if let Some(bucket) = overrides.bucket {
            self.bucket = bucket;
        }
        if let Some(max) = overrides.max_line_length {
            self.max_line_length = max;
        }
        if let Some(policy) = overrides.out_of_range_status {
            self.out_of_range_status = policy;
        }
        // Command-line patterns are alternates, tried after the configured ones.
        for pattern in &overrides.extra_timestamp_formats {
            if !self.timestamp_formats.contains(pattern) {
                self.timestamp_formats.push(pattern.clone());
            }
        }
        self.strict |= overrides.strict;
    }
}

/// Command-line values layered over the file (or default) configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub format: Option<LogFormat>,
    pub top_k: Option<usize>,
    pub bucket: Option<Duration>,
    pub max_line_length: Option<usize>,
    pub out_of_range_status: Option<StatusPolicy>,
    pub extra_timestamp_formats: Vec<String>,
    pub strict: bool,
}
