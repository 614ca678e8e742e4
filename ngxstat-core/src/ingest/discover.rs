use crate::ingest::IngestError;
use glob::glob;
use std::path::PathBuf;

/// Files matching a glob pattern, sorted. Unreadable entries are skipped and
/// directories never match.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>, IngestError> {
    let mut paths: Vec<_> = glob(pattern)
        .map_err(|e| IngestError::Glob {
            pattern: pattern.to_string(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    paths.sort();
    Ok(paths)
}

pub fn is_glob_pattern(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}
