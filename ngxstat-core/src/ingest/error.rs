use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {input}: {source}")]
    Open {
        input: String,
        #[source]
        source: io::Error,
    },

    #[error("failed reading {input} after line {line}: {source}")]
    Read {
        input: String,
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("glob pattern error: {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl IngestError {
    pub fn open(input: impl Into<String>, source: io::Error) -> Self {
        Self::Open {
            input: input.into(),
            source,
        }
    }

    pub fn read(input: impl Into<String>, line: u64, source: io::Error) -> Self {
        Self::Read {
            input: input.into(),
            line,
            source,
        }
    }

    /// The input this error belongs to, if any.
    pub fn input(&self) -> Option<&str> {
        match self {
            IngestError::Open { input, .. } | IngestError::Read { input, .. } => Some(input),
            IngestError::Glob { .. } => None,
        }
    }
}
