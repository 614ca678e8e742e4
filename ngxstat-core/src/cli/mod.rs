//! Command implementations behind the `ngxstat` binary.
//!
//! Commands return an [`ExitStatus`] for outcomes the caller must map to a
//! process exit code, and `Err` only for failures that stop the command.

mod args;
mod config;
mod records;
mod stats;
#[cfg(test)]
mod tests;

pub use args::*;
pub use config::*;
pub use records::*;
pub use stats::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Configuration or input I/O failure.
    Failure,
    /// Strict mode and at least one line failed to parse.
    StrictViolation,
    Interrupted,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::StrictViolation => 3,
            ExitStatus::Interrupted => 130,
        }
    }
}
