//! Record Normalizer
//!
//! Coerces the field slices cut by a grammar into canonical typed values:
//! timestamps through an ordered list of patterns (first match wins), methods
//! to uppercase, sizes to integers, `-` placeholders to `None`.

mod method;
mod normalizer;
mod record;
mod timestamp;

pub use method::*;
pub use normalizer::*;
pub use record::*;
pub use timestamp::*;
