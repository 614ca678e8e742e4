use crate::normalize::{HttpMethod, TimestampPattern};
use crate::parse::LogFormat;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Status codes outside this range are accepted but tallied separately.
pub const STATUS_RANGE: RangeInclusive<u16> = 100..=599;

/// One successfully parsed access-log line.
///
/// Only ever built from a line that satisfied the grammar; no field is synthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub line_number: u64,
    pub client_addr: String,
    pub remote_user: Option<String>,
    pub timestamp: DateTime<FixedOffset>,
    pub method: HttpMethod,
    /// Request target as logged, query included.
    pub path: String,
    pub protocol: String,
    pub status: u16,
    pub bytes_sent: u64,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<UpstreamTiming>,
}

/// Fields only present in the `upstream` layout. `-` becomes `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamTiming {
    pub request_length: Option<u64>,
    /// Seconds, exactly as nginx wrote `$request_time`. Only kept when numeric.
    pub request_time: Option<String>,
    pub upstream_name: Option<String>,
    pub upstream_addr_list: Option<String>,
    pub upstream_addr: Option<String>,
    pub upstream_response_length: Option<String>,
    pub upstream_response_time: Option<String>,
    pub upstream_status: Option<String>,
    pub request_id: Option<String>,
}

impl UpstreamTiming {
    pub fn request_time_ms(&self) -> Option<u64> {
        self.request_time
            .as_deref()
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| (secs * 1000.0).round() as u64)
    }
}

impl LogRecord {
    pub fn status_in_range(&self) -> bool {
        STATUS_RANGE.contains(&self.status)
    }

    /// Path with the query component removed.
    pub fn path_only(&self) -> &str {
        self.path
            .split_once('?')
            .map_or(self.path.as_str(), |(path, _)| path)
    }

    /// Writes the record back out in the given grammar, with the timestamp in
    /// `time`. Absent optional fields come back as `-`; the identity field is
    /// always `-`.
    pub fn to_log_line(&self, format: LogFormat, time: &TimestampPattern) -> String {
        let mut line = format!(
            "{} - {} [{}] \"{} {} {}\" {:03} {}",
            self.client_addr,
            self.remote_user.as_deref().unwrap_or("-"),
            time.format(&self.timestamp),
            self.method,
            self.path,
            self.protocol,
            self.status,
            self.bytes_sent,
        );

        if format == LogFormat::Common {
            return line;
        }

        line.push_str(&format!(
            " \"{}\" \"{}\"",
            self.referrer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        ));

        if format == LogFormat::Upstream {
            let up = self.upstream.as_ref();
            let text = |f: fn(&UpstreamTiming) -> Option<&String>| {
                up.and_then(f).map_or("-".to_string(), String::clone)
            };

            line.push_str(&format!(
                " {} {} [{}] [{}] {} {} {} {} {}",
                up.and_then(|u| u.request_length)
                    .map_or("-".to_string(), |n| n.to_string()),
                text(|u| u.request_time.as_ref()),
                text(|u| u.upstream_name.as_ref()),
                text(|u| u.upstream_addr_list.as_ref()),
                text(|u| u.upstream_addr.as_ref()),
                text(|u| u.upstream_response_length.as_ref()),
                text(|u| u.upstream_response_time.as_ref()),
                text(|u| u.upstream_status.as_ref()),
                text(|u| u.request_id.as_ref()),
            ));
        }

        line
    }
}
