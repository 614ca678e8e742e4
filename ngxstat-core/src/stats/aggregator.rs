use crate::conf::AnalyzerConfig;
use crate::normalize::LogRecord;
use crate::parse::{FailureReason, ParseFailure, ParseOutcome};
use crate::stats::{
    AggregateSnapshot, Histogram, LATENCY_BUCKETS_MS, LatencyBucket, LatencySummary,
    StatusHistogram, TimeBuckets, TopK,
};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::time::Duration;

const METHOD_CAPACITY: usize = 32;

#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    /// Entries reported per ranking.
    pub top_k: usize,
    /// Entries tracked per ranking.
    pub capacity: usize,
    pub bucket: Duration,
    pub rank_paths_with_query: bool,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        AggregatorSettings::from_config(&AnalyzerConfig::default())
    }
}

impl AggregatorSettings {
    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self {
            top_k: cfg.top_k,
            capacity: cfg.top_k_capacity(),
            bucket: cfg.bucket,
            rank_paths_with_query: cfg.rank_paths_with_query,
        }
    }
}

/// Running totals. Counts only ever grow.
#[derive(Debug, Clone)]
pub struct AggregateState {
    lines_seen: u64,
    parsed: u64,
    failed: u64,
    filtered_out: u64,
    failures: BTreeMap<FailureReason, u64>,
    status: StatusHistogram,
    out_of_range_status: u64,
    bytes_sent: u64,
    first_timestamp: Option<DateTime<FixedOffset>>,
    last_timestamp: Option<DateTime<FixedOffset>>,
    buckets: TimeBuckets,
    clients: TopK,
    paths: TopK,
    methods: TopK,
    latency: Histogram,
    merged: bool,
}

impl AggregateState {
    fn new(settings: &AggregatorSettings) -> Self {
        Self {
            lines_seen: 0,
            parsed: 0,
            failed: 0,
            filtered_out: 0,
            failures: BTreeMap::new(),
            status: StatusHistogram::default(),
            out_of_range_status: 0,
            bytes_sent: 0,
            first_timestamp: None,
            last_timestamp: None,
            buckets: TimeBuckets::new(settings.bucket),
            clients: TopK::new(settings.capacity),
            paths: TopK::new(settings.capacity),
            methods: TopK::new(METHOD_CAPACITY),
            latency: Histogram::new(LATENCY_BUCKETS_MS),
            merged: false,
        }
    }
}

/// Folds parse outcomes into an [`AggregateState`] it owns exclusively.
///
/// `observe` calls are expected one at a time, in stream order.
#[derive(Debug, Clone)]
pub struct StreamingAggregator {
    settings: AggregatorSettings,
    state: AggregateState,
}

impl Default for StreamingAggregator {
    fn default() -> Self {
        Self::new(AggregatorSettings::default())
    }
}

impl StreamingAggregator {
    pub fn new(settings: AggregatorSettings) -> Self {
        let state = AggregateState::new(&settings);
        Self { settings, state }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(AggregatorSettings::from_config(cfg))
    }

    pub fn observe(&mut self, outcome: &ParseOutcome) {
        match outcome {
            Ok(record) => self.observe_record(record),
            Err(failure) => self.observe_failure(failure),
        }
    }

    pub fn observe_record(&mut self, record: &LogRecord) {
        let s = &mut self.state;
        s.lines_seen += 1;
        s.parsed += 1;

        s.status.record(record.status);
        if !record.status_in_range() {
            s.out_of_range_status += 1;
        }

        s.bytes_sent = s.bytes_sent.saturating_add(record.bytes_sent);
        s.buckets.record(&record.timestamp, record.bytes_sent);

        if s.first_timestamp.is_none_or(|first| record.timestamp < first) {
            s.first_timestamp = Some(record.timestamp);
        }
        if s.last_timestamp.is_none_or(|last| record.timestamp > last) {
            s.last_timestamp = Some(record.timestamp);
        }

        s.clients.observe(&record.client_addr);
        let path = if self.settings.rank_paths_with_query {
            record.path.as_str()
        } else {
            record.path_only()
        };
        s.paths.observe(path);
        s.methods.observe(record.method.as_str());

        if let Some(ms) = record.upstream.as_ref().and_then(|u| u.request_time_ms()) {
            s.latency.record(ms);
        }
    }

    pub fn observe_failure(&mut self, failure: &ParseFailure) {
        let s = &mut self.state;
        s.lines_seen += 1;
        s.failed += 1;
        *s.failures.entry(failure.reason).or_insert(0) += 1;
    }

    /// A parsed record a filter excluded: counted, not aggregated.
    pub fn observe_filtered(&mut self, _record: &LogRecord) {
        let s = &mut self.state;
        s.lines_seen += 1;
        s.parsed += 1;
        s.filtered_out += 1;
    }

    pub fn lines_seen(&self) -> u64 {
        self.state.lines_seen
    }

    pub fn failed(&self) -> u64 {
        self.state.failed
    }

    /// Folds another aggregator's state into this one.
    ///
    /// Counts, histograms and buckets sum exactly. Rankings are re-ranked from
    /// the union of both trackers, which is approximate whenever either side
    /// had to evict; the snapshot reports this through `top_k_exact`.
    pub fn merge(&mut self, other: StreamingAggregator) {
        let s = &mut self.state;
        let o = other.state;

        s.lines_seen += o.lines_seen;
        s.parsed += o.parsed;
        s.failed += o.failed;
        s.filtered_out += o.filtered_out;
        for (reason, count) in o.failures {
            *s.failures.entry(reason).or_insert(0) += count;
        }

        s.status.merge(&o.status);
        s.out_of_range_status += o.out_of_range_status;
        s.bytes_sent = s.bytes_sent.saturating_add(o.bytes_sent);

        s.first_timestamp = match (s.first_timestamp, o.first_timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        s.last_timestamp = match (s.last_timestamp, o.last_timestamp) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        s.buckets.merge(&o.buckets);
        s.clients.merge(o.clients);
        s.paths.merge(o.paths);
        s.methods.merge(o.methods);
        s.latency.merge(&o.latency);
        s.merged = true;
    }

    pub fn snapshot(&self) -> AggregateSnapshot {
        let s = &self.state;
        let top_k = self.settings.top_k;

        let failures_by_reason = FailureReason::ALL
            .iter()
            .map(|reason| (*reason, s.failures.get(reason).copied().unwrap_or(0)))
            .collect();

        AggregateSnapshot {
            lines_seen: s.lines_seen,
            parsed: s.parsed,
            failed: s.failed,
            filtered_out: s.filtered_out,
            failures_by_reason,
            status: s.status.counts().clone(),
            status_classes: s.status.classes(),
            out_of_range_status: s.out_of_range_status,
            bytes_sent: s.bytes_sent,
            first_timestamp: s.first_timestamp,
            last_timestamp: s.last_timestamp,
            bucket_width_secs: s.buckets.width_secs(),
            buckets: s.buckets.iter().collect(),
            top_clients: s.clients.ranked(top_k),
            top_paths: s.paths.ranked(top_k),
            top_methods: s.methods.ranked(METHOD_CAPACITY),
            latency: latency_summary(&s.latency),
            merged: s.merged,
            top_k_exact: s.clients.is_exact() && s.paths.is_exact(),
            top_methods_exact: s.methods.is_exact(),
        }
    }

    pub fn into_snapshot(self) -> AggregateSnapshot {
        self.snapshot()
    }
}

fn latency_summary(latency: &Histogram) -> Option<LatencySummary> {
    let samples = latency.total();
    if samples == 0 {
        return None;
    }

    Some(LatencySummary {
        samples,
        buckets: latency
            .labelled_counts()
            .into_iter()
            .map(|(label, count)| LatencyBucket { label, count })
            .collect(),
        p50_ms: latency.quantile_ms(0.50),
        p95_ms: latency.quantile_ms(0.95),
        p99_ms: latency.quantile_ms(0.99),
    })
}
