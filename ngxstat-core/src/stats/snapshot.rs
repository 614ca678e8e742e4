use crate::parse::FailureReason;
use crate::stats::{BucketCount, RankedEntry, StatusClasses};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// Read-only view of the aggregate state at one point of the stream.
///
/// Valid for any prefix of the input: taking one mid-run, or after the
/// driver stopped early, gives a coherent summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub lines_seen: u64,
    pub parsed: u64,
    pub failed: u64,
    /// Parsed, but excluded by a record filter.
    pub filtered_out: u64,

    /// Every reason is present, zero or not.
    pub failures_by_reason: BTreeMap<FailureReason, u64>,

    pub status: BTreeMap<u16, u64>,
    pub status_classes: StatusClasses,
    /// Records whose status fell outside 100–599.
    pub out_of_range_status: u64,

    pub bytes_sent: u64,
    pub first_timestamp: Option<DateTime<FixedOffset>>,
    pub last_timestamp: Option<DateTime<FixedOffset>>,

    pub bucket_width_secs: i64,
    pub buckets: Vec<BucketCount>,

    pub top_clients: Vec<RankedEntry>,
    pub top_paths: Vec<RankedEntry>,
    pub top_methods: Vec<RankedEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencySummary>,

    /// Built from more than one aggregator.
    pub merged: bool,
    /// False when client or path counts may be over-estimates; see
    /// `RankedEntry::error`.
    pub top_k_exact: bool,
    /// Same, for the method ranking.
    pub top_methods_exact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub samples: u64,
    pub buckets: Vec<LatencyBucket>,
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyBucket {
    pub label: String,
    pub count: u64,
}

impl AggregateSnapshot {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failure_rate(&self) -> f64 {
        if self.lines_seen == 0 {
            return 0.0;
        }
        self.failed as f64 / self.lines_seen as f64
    }

    /// Aggregated requests over the observed time span.
    pub fn requests(&self) -> u64 {
        self.parsed - self.filtered_out
    }

    /// Mean rate across the observed time span; `None` for an empty or
    /// instantaneous span.
    pub fn requests_per_second(&self) -> Option<f64> {
        let (first, last) = (self.first_timestamp?, self.last_timestamp?);
        let span = (last - first).num_milliseconds();
        if span <= 0 {
            return None;
        }
        Some(self.requests() as f64 / (span as f64 / 1000.0))
    }
}
