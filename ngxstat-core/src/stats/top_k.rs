use ahash::AHashMap;
use serde::Serialize;
use std::cmp::Reverse;

/// Fixed-capacity heavy-hitter counter (Space-Saving).
///
/// While fewer than `capacity` distinct keys have been seen every count is
/// exact. After that, a new key takes over the slot with the lowest count,
/// inheriting that count plus one; the inherited part is kept as `error`, so
/// a reported count is an upper bound and `count - error` a lower bound.
///
/// Ranking is by count, ties broken by the order keys were first tracked.
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    slots: Vec<Slot>,
    index: AHashMap<String, usize>,
    next_seq: u64,
    exact: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    key: String,
    count: u64,
    error: u64,
    first_seen: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
    /// Upper bound on how much of `count` may belong to evicted keys.
    pub error: u64,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
            index: AHashMap::with_capacity(capacity),
            next_seq: 0,
            exact: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// False once any eviction or lossy merge has happened.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn observe(&mut self, key: &str) {
        if let Some(&i) = self.index.get(key) {
            self.slots[i].count += 1;
            return;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        if self.slots.len() < self.capacity {
            self.index.insert(key.to_string(), self.slots.len());
            self.slots.push(Slot {
                key: key.to_string(),
                count: 1,
                error: 0,
                first_seen: seq,
            });
            return;
        }

        // Lowest count goes; among equals the most recently tracked one goes,
        // so older keys keep their tie-break position.
        let Some(victim) = self
            .slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| (s.count, Reverse(s.first_seen)))
            .map(|(i, _)| i)
        else {
            return;
        };

        let floor = self.slots[victim].count;
        let evicted = std::mem::replace(
            &mut self.slots[victim],
            Slot {
                key: key.to_string(),
                count: floor + 1,
                error: floor,
                first_seen: seq,
            },
        );
        self.index.remove(&evicted.key);
        self.index.insert(key.to_string(), victim);
        self.exact = false;
    }

    /// Count currently attributed to `key`, if it is tracked.
    pub fn count(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.slots[i].count)
    }

    /// The `k` highest counts, best first.
    pub fn ranked(&self, k: usize) -> Vec<RankedEntry> {
        let mut order: Vec<&Slot> = self.slots.iter().collect();
        order.sort_by_key(|s| (Reverse(s.count), s.first_seen));

        order
            .into_iter()
            .take(k)
            .map(|s| RankedEntry {
                key: s.key.clone(),
                count: s.count,
                error: s.error,
            })
            .collect()
    }

    /// Re-ranks the union of both trackers and keeps the best `capacity`.
    ///
    /// Keys tracked on only one side lose whatever the other side saw of them
    /// before evicting, so after a merge rankings are approximate unless both
    /// sides were exact and the union fits.
    pub fn merge(&mut self, other: TopK) {
        let offset = self.next_seq;

        for slot in other.slots {
            match self.index.get(&slot.key) {
                Some(&i) => {
                    self.slots[i].count += slot.count;
                    self.slots[i].error += slot.error;
                }
                None => {
                    self.index.insert(slot.key.clone(), self.slots.len());
                    self.slots.push(Slot {
                        first_seen: slot.first_seen + offset,
                        ..slot
                    });
                }
            }
        }

        self.next_seq = offset + other.next_seq;
        self.exact &= other.exact;

        if self.slots.len() > self.capacity {
            self.slots.sort_by_key(|s| (Reverse(s.count), s.first_seen));
            self.slots.truncate(self.capacity);
            self.exact = false;
        }

        self.index = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.key.clone(), i))
            .collect();
    }
}
