use crate::ingest::{IngestError, discover, is_glob_pattern};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::debug;

const READ_BUFFER: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn open(&self) -> Result<Box<dyn BufRead>, IngestError> {
        match self {
            InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|e| IngestError::open(self.label(), e))?;
                Ok(Box::new(BufReader::with_capacity(READ_BUFFER, file)))
            }
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Turns command-line arguments into sources, in argument order.
///
/// Glob patterns expand to their sorted matches. A pattern that matches
/// nothing (or does not parse) is kept as a literal path, so it fails at open
/// time and is reported like any other missing input.
pub fn expand_inputs<S: AsRef<str>>(args: &[S]) -> Vec<InputSource> {
    let mut sources = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if !is_glob_pattern(arg) {
            sources.push(InputSource::from_arg(arg));
            continue;
        }

        match discover(arg) {
            Ok(paths) if !paths.is_empty() => {
                debug!(pattern = arg, matches = paths.len(), "expanded input pattern");
                sources.extend(paths.into_iter().map(InputSource::File));
            }
            _ => sources.push(InputSource::from_arg(arg)),
        }
    }

    sources
}
