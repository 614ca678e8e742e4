use crate::normalize::LogRecord;

/// Case-insensitive substring filters; a record must match every one that is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    status: Option<String>,
    client: Option<String>,
    path: Option<String>,
}

impl RecordFilter {
    pub fn new(status: Option<&str>, client: Option<&str>, path: Option<&str>) -> Self {
        let needle = |s: Option<&str>| {
            s.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
        };

        Self {
            status: needle(status),
            client: needle(client),
            path: needle(path),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.client.is_none() && self.path.is_none()
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|needle| format!("{:03}", record.status).contains(needle));

        let client_ok = self
            .client
            .as_deref()
            .is_none_or(|needle| record.client_addr.to_lowercase().contains(needle));

        let path_ok = self
            .path
            .as_deref()
            .is_none_or(|needle| record.path.to_lowercase().contains(needle));

        status_ok && client_ok && path_ok
    }
}
