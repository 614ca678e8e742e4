use crate::normalize::{LogRecord, TimestampPattern, UpstreamTiming};
use std::io::{self, Write};

/// Column set of the record export, in order.
pub const CSV_HEADERS: [&str; 17] = [
    "timestamp",
    "remote_addr",
    "method",
    "url",
    "protocol",
    "status",
    "body_bytes_sent",
    "http_referer",
    "http_user_agent",
    "request_length",
    "request_time",
    "upstream_name",
    "upstream_addr",
    "upstream_response_length",
    "upstream_response_time",
    "upstream_status",
    "request_id",
];

/// Streams records as CSV rows under a single header row.
///
/// Absent fields are written as empty cells. Layouts without upstream
/// fields leave the last eight columns empty.
pub struct CsvRecordWriter<W: Write> {
    inner: csv::Writer<W>,
    time: TimestampPattern,
}

impl<W: Write> CsvRecordWriter<W> {
    /// Writes the header row straight away, so an export with no records
    /// still carries its columns.
    pub fn new(out: W, time: TimestampPattern) -> io::Result<Self> {
        let mut inner = csv::Writer::from_writer(out);
        inner.write_record(CSV_HEADERS).map_err(into_io)?;
        Ok(Self { inner, time })
    }

    pub fn write(&mut self, record: &LogRecord) -> io::Result<()> {
        let up = record.upstream.as_ref();
        let upstream =
            |f: fn(&UpstreamTiming) -> Option<String>| up.and_then(f).unwrap_or_default();

        let row = [
            self.time.format(&record.timestamp),
            record.client_addr.clone(),
            record.method.to_string(),
            record.path.clone(),
            record.protocol.clone(),
            record.status.to_string(),
            record.bytes_sent.to_string(),
            record.referrer.clone().unwrap_or_default(),
            record.user_agent.clone().unwrap_or_default(),
            upstream(|u| u.request_length.map(|n| n.to_string())),
            upstream(|u| u.request_time.clone()),
            upstream(|u| u.upstream_name.clone()),
            upstream(|u| u.upstream_addr.clone()),
            upstream(|u| u.upstream_response_length.clone()),
            upstream(|u| u.upstream_response_time.clone()),
            upstream(|u| u.upstream_status.clone()),
            upstream(|u| u.request_id.clone()),
        ];

        self.inner.write_record(&row).map_err(into_io)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// Keeps the io kind intact so a closed pipe is still recognisable upstream.
fn into_io(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::other(format!("csv: {other:?}")),
    }
}
