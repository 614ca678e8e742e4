//! Ingestion Driver
//!
//! Supplies lines to the parser in file order, one per physical line, and
//! feeds the outcomes to an aggregator. Only I/O problems are errors here,
//! and they are scoped to the input that raised them: the remaining inputs
//! are still processed and every error is reported at the end of the run.

mod discover;
mod driver;
mod error;
mod filter;
mod reader;
mod source;
#[cfg(test)]
mod tests;

pub use discover::*;
pub use driver::*;
pub use error::*;
pub use filter::*;
pub use reader::*;
pub use source::*;
