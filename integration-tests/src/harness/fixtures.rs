use chrono::{DateTime, Duration, FixedOffset};
use ngxstat_core::ingest::InputSource;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// nginx `$time_local` of the first generated line.
pub const BASE_TIME: &str = "10/Oct/2023:13:55:36 +0000";

/// A combined-format line, `offset_secs` after [`BASE_TIME`].
pub fn combined_line(addr: &str, path: &str, status: u16, offset_secs: i64) -> String {
    let base: DateTime<FixedOffset> =
        DateTime::parse_from_str(BASE_TIME, "%d/%b/%Y:%H:%M:%S %z").expect("valid base time");
    let ts = base + Duration::seconds(offset_secs);

    format!(
        r#"{addr} - - [{}] "GET {path} HTTP/1.1" {status:03} 512 "-" "integration/1.0""#,
        ts.format("%d/%b/%Y:%H:%M:%S %z")
    )
}

/// Log files in a temporary directory that lives as long as the fixture.
pub struct LogFixture {
    dir: TempDir,
}

impl LogFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn write(&self, name: &str, lines: &[String]) -> InputSource {
        let path = self.path(name);
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(&path, body).expect("failed to write log fixture");
        InputSource::File(path)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for LogFixture {
    fn default() -> Self {
        Self::new()
    }
}
