/// Upper bounds, in milliseconds, of the upstream latency slots.
pub const LATENCY_BUCKETS_MS: &[u64] = &[1, 5, 10, 25, 50, 100, 250, 500, 1000, 2500, 5000, 10000];

/// Request times counted into fixed millisecond slots, plus one overflow slot
/// past the last bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bounds: &'static [u64],
    counts: Vec<u64>,
}

impl Histogram {
    pub fn new(bounds: &'static [u64]) -> Self {
        Self {
            bounds,
            counts: vec![0; bounds.len() + 1],
        }
    }

    pub fn record(&mut self, ms: u64) {
        let slot = self
            .bounds
            .iter()
            .position(|upper| ms <= *upper)
            .unwrap_or(self.bounds.len());
        self.counts[slot] += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Both sides must share the same bounds.
    pub fn merge(&mut self, other: &Histogram) {
        debug_assert_eq!(self.bounds, other.bounds);
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
    }

    /// One `(label, count)` per slot: `0–1ms`, `2–5ms`, ..., `>10000ms`.
    pub fn labelled_counts(&self) -> Vec<(String, u64)> {
        self.counts
            .iter()
            .enumerate()
            .map(|(slot, count)| (self.label(slot), *count))
            .collect()
    }

    /// Upper bound of the slot holding the `q` quantile. Overflow samples
    /// report one past the last bound; an empty histogram reports 0.
    pub fn quantile_ms(&self, q: f64) -> u64 {
        let total = self.total();
        if total == 0 {
            return 0;
        }

        let rank = (total as f64 * q).ceil() as u64;
        let mut seen = 0;
        for (slot, count) in self.counts.iter().enumerate() {
            seen += count;
            if seen >= rank {
                return self.upper_ms(slot);
            }
        }
        self.upper_ms(self.bounds.len())
    }

    fn upper_ms(&self, slot: usize) -> u64 {
        match self.bounds.get(slot) {
            Some(upper) => *upper,
            None => self.bounds.last().map_or(0, |last| last.saturating_add(1)),
        }
    }

    fn label(&self, slot: usize) -> String {
        let Some(last) = self.bounds.last() else {
            return "all".to_string();
        };
        match self.bounds.get(slot) {
            None => format!(">{last}ms"),
            Some(upper) if slot == 0 => format!("0–{upper}ms"),
            Some(upper) => format!("{}–{upper}ms", self.bounds[slot - 1] + 1),
        }
    }
}
