use crate::normalize::STATUS_RANGE;
use serde::Serialize;
use std::collections::BTreeMap;

/// Status code -> count. Keys are three-digit codes, so at most 1000 entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusHistogram {
    counts: BTreeMap<u16, u64>,
}

impl StatusHistogram {
    pub fn record(&mut self, status: u16) {
        *self.counts.entry(status).or_insert(0) += 1;
    }

    pub fn get(&self, status: u16) -> u64 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn merge(&mut self, other: &StatusHistogram) {
        for (status, count) in &other.counts {
            *self.counts.entry(*status).or_insert(0) += count;
        }
    }

    pub fn counts(&self) -> &BTreeMap<u16, u64> {
        &self.counts
    }

    pub fn classes(&self) -> StatusClasses {
        let mut classes = StatusClasses::default();

        for (status, count) in &self.counts {
            let slot = match status {
                s if !STATUS_RANGE.contains(s) => &mut classes.out_of_range,
                100..=199 => &mut classes.informational,
                200..=299 => &mut classes.success,
                300..=399 => &mut classes.redirection,
                400..=499 => &mut classes.client_error,
                _ => &mut classes.server_error,
            };
            *slot += count;
        }

        classes
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusClasses {
    pub informational: u64,
    pub success: u64,
    pub redirection: u64,
    pub client_error: u64,
    pub server_error: u64,
    pub out_of_range: u64,
}
