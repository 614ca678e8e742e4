use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Requests grouped into fixed-width intervals keyed by interval start.
///
/// Buckets are created on first use and never pruned. Iteration is always
/// chronological, whatever order records arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBuckets {
    width_secs: i64,
    buckets: BTreeMap<i64, BucketTotals>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketTotals {
    pub requests: u64,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub start: DateTime<Utc>,
    pub requests: u64,
    pub bytes: u64,
}

impl TimeBuckets {
    pub fn new(width: Duration) -> Self {
        Self {
            width_secs: width.as_secs().max(1) as i64,
            buckets: BTreeMap::new(),
        }
    }

    pub fn width_secs(&self) -> i64 {
        self.width_secs
    }

    /// Epoch second the bucket holding `ts` starts at.
    pub fn bucket_start(&self, ts: &DateTime<FixedOffset>) -> i64 {
        self.floor(ts.timestamp())
    }

    fn floor(&self, epoch_secs: i64) -> i64 {
        epoch_secs.div_euclid(self.width_secs) * self.width_secs
    }

    pub fn record(&mut self, ts: &DateTime<FixedOffset>, bytes: u64) {
        let totals = self.buckets.entry(self.bucket_start(ts)).or_default();
        totals.requests += 1;
        totals.bytes = totals.bytes.saturating_add(bytes);
    }

    pub fn merge(&mut self, other: &TimeBuckets) {
        for (start, theirs) in &other.buckets {
            let totals = self.buckets.entry(self.floor(*start)).or_default();
            totals.requests += theirs.requests;
            totals.bytes = totals.bytes.saturating_add(theirs.bytes);
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BucketCount> + '_ {
        self.buckets.iter().filter_map(|(start, totals)| {
            Some(BucketCount {
                start: DateTime::<Utc>::from_timestamp(*start, 0)?,
                requests: totals.requests,
                bytes: totals.bytes,
            })
        })
    }
}
