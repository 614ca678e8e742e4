pub mod fixtures;
pub mod tracing;

pub use fixtures::{LogFixture, combined_line};
pub use tracing::{CapturedEvent, capture_events};
