use crate::conf::AnalyzerConfig;
use crate::normalize::{HttpMethod, LogRecord, STATUS_RANGE, TimestampParser, UpstreamTiming};
use crate::parse::{FailureReason, RawFields, RawUpstreamFields};
use serde::{Deserialize, Serialize};

/// What to do with a well-formed status code outside 100–599.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// Keep the record and count it under the out-of-range tally.
    #[default]
    Tally,
    /// Turn the line into an `invalid-status-code` failure.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    timestamps: TimestampParser,
    status_policy: StatusPolicy,
}

impl RecordNormalizer {
    pub fn new(timestamps: TimestampParser, status_policy: StatusPolicy) -> Self {
        Self {
            timestamps,
            status_policy,
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(
            TimestampParser::new(&cfg.timestamp_formats),
            cfg.out_of_range_status,
        )
    }

    pub fn timestamps(&self) -> &TimestampParser {
        &self.timestamps
    }

    pub fn normalize(
        &self,
        line_number: u64,
        fields: RawFields<'_>,
    ) -> Result<LogRecord, FailureReason> {
        let timestamp = self
            .timestamps
            .parse(fields.time_local)
            .ok_or(FailureReason::InvalidTimestamp)?;

        let status: u16 = fields
            .status
            .parse()
            .map_err(|_| FailureReason::InvalidStatusCode)?;
        if self.status_policy == StatusPolicy::Reject && !STATUS_RANGE.contains(&status) {
            return Err(FailureReason::InvalidStatusCode);
        }

        let bytes_sent = parse_size(fields.body_bytes_sent)?;

        Ok(LogRecord {
            line_number,
            client_addr: fields.remote_addr.to_string(),
            remote_user: dash_to_none(fields.remote_user),
            timestamp,
            method: HttpMethod::canonicalize(fields.method),
            path: fields.path.to_string(),
            protocol: fields.protocol.to_string(),
            status,
            bytes_sent,
            referrer: fields.referrer.and_then(dash_to_none),
            user_agent: fields.user_agent.and_then(dash_to_none),
            upstream: fields.upstream.map(upstream_timing),
        })
    }
}

/// `-` means "nothing sent" and is 0 bytes, not a failure.
fn parse_size(raw: &str) -> Result<u64, FailureReason> {
    if raw == "-" {
        return Ok(0);
    }
    raw.parse().map_err(|_| FailureReason::InvalidSizeField)
}

fn dash_to_none(raw: &str) -> Option<String> {
    match raw {
        "" | "-" => None,
        other => Some(other.to_string()),
    }
}

// Upstream fields are informational; unparseable numbers degrade to None.
fn upstream_timing(raw: RawUpstreamFields<'_>) -> UpstreamTiming {
    UpstreamTiming {
        request_length: raw.request_length.parse().ok(),
        request_time: Some(raw.request_time)
            .filter(|t| t.parse::<f64>().is_ok())
            .map(str::to_string),
        upstream_name: dash_to_none(raw.upstream_name),
        upstream_addr_list: dash_to_none(raw.upstream_addr_list),
        upstream_addr: dash_to_none(raw.upstream_addr),
        upstream_response_length: dash_to_none(raw.upstream_response_length),
        upstream_response_time: dash_to_none(raw.upstream_response_time),
        upstream_status: dash_to_none(raw.upstream_status),
        request_id: dash_to_none(raw.request_id),
    }
}
