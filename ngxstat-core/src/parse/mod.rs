//! Line Parser
//!
//! Turns one physical access-log line into exactly one of a [`LogRecord`] or a
//! [`ParseFailure`]. Nothing is carried between lines and nothing is raised:
//! a line that does not fit the configured grammar comes back as data, tagged
//! with the first field that broke the grammar.
//!
//! raw line
//! length / emptiness gate
//! LogFormat::tokenize  -> RawFields
//! RecordNormalizer     -> LogRecord
//!
//! [`LogRecord`]: crate::normalize::LogRecord

mod failure;
mod fields;
mod format;
mod line_parser;
mod raw_line;
mod scanner;
#[cfg(test)]
mod tests;

pub use failure::*;
pub use fields::*;
pub use format::*;
pub use line_parser::*;
pub use raw_line::*;
