//! Streaming Aggregator
//!
//! Folds parse outcomes into running statistics whose memory does not grow
//! with the input: the status histogram is bounded by the three-digit code
//! space, address and path rankings use fixed-capacity trackers, and time
//! buckets grow with the time span of the log rather than its line count.
//!
//! ParseOutcome
//! StreamingAggregator::observe
//! AggregateState
//! StreamingAggregator::snapshot
//! AggregateSnapshot
//!
//! Aggregators are single-owner and not synchronized. Parallel runs give each
//! worker its own instance and combine them afterwards with
//! [`StreamingAggregator::merge`]; counts merge exactly, rankings do not
//! (see [`AggregateSnapshot::top_k_exact`]).

mod aggregator;
mod buckets;
mod histogram;
mod snapshot;
mod status;
#[cfg(test)]
mod tests;
mod top_k;

pub use aggregator::*;
pub use buckets::*;
pub use histogram::*;
pub use snapshot::*;
pub use status::*;
pub use top_k::*;
