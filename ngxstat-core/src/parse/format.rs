use crate::parse::scanner::Scanner;
use crate::parse::{FailureReason, RawFields, RawUpstreamFields};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of line grammars. One is chosen per run by configuration;
/// lines are never sniffed individually.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `addr ident user [time] "request" status size`
    Common,
    /// Common plus `"referrer" "user-agent"`.
    #[default]
    Combined,
    /// Combined plus the upstream fields written by ingress-nginx.
    Upstream,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Common => "common",
            LogFormat::Combined => "combined",
            LogFormat::Upstream => "upstream",
        }
    }

    /// Cuts a line into fields following this grammar.
    ///
    /// Content after the last field of `common` and `combined` is ignored,
    /// since nginx setups routinely append their own variables.
    pub fn tokenize(self, line: &str) -> Result<RawFields<'_>, FailureReason> {
        let mut sc = Scanner::new(line);

        let remote_addr = sc.bare()?;
        let _ident = sc.bare()?;
        let remote_user = sc.bare()?;
        let time_local = sc.bracketed(FailureReason::InvalidTimestamp)?;
        let request = sc.quoted(FailureReason::MalformedRequestLine)?;
        let (method, path, protocol) = split_request(request)?;
        let status = sc.bare()?;
        check_status(status)?;
        let body_bytes_sent = sc.bare()?;
        check_size(body_bytes_sent)?;

        let mut fields = RawFields {
            remote_addr,
            remote_user,
            time_local,
            method,
            path,
            protocol,
            status,
            body_bytes_sent,
            referrer: None,
            user_agent: None,
            upstream: None,
        };

        if self == LogFormat::Common {
            return Ok(fields);
        }

        fields.referrer = Some(sc.quoted(FailureReason::TruncatedLine)?);
        fields.user_agent = Some(sc.quoted(FailureReason::TruncatedLine)?);

        if self == LogFormat::Upstream {
            fields.upstream = Some(RawUpstreamFields {
                request_length: sc.bare()?,
                request_time: sc.bare()?,
                upstream_name: sc.bracketed(FailureReason::TruncatedLine)?,
                upstream_addr_list: sc.bracketed(FailureReason::TruncatedLine)?,
                upstream_addr: sc.bare()?,
                upstream_response_length: sc.bare()?,
                upstream_response_time: sc.bare()?,
                upstream_status: sc.bare()?,
                request_id: sc.bare()?,
            });
        }

        Ok(fields)
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The grammar only wants three digits; range is a policy question for the normalizer.
fn check_status(status: &str) -> Result<(), FailureReason> {
    if status.len() == 3 && status.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FailureReason::InvalidStatusCode)
    }
}

fn check_size(size: &str) -> Result<(), FailureReason> {
    if size == "-" || (!size.is_empty() && size.bytes().all(|b| b.is_ascii_digit())) {
        Ok(())
    } else {
        Err(FailureReason::InvalidSizeField)
    }
}

fn split_request(request: &str) -> Result<(&str, &str, &str), FailureReason> {
    let mut parts = request.split_ascii_whitespace();

    let (Some(method), Some(path), Some(protocol), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(FailureReason::MalformedRequestLine);
    };

    if !method.bytes().all(is_token_byte) {
        return Err(FailureReason::MalformedRequestLine);
    }

    let is_http = protocol
        .get(..5)
        .is_some_and(|p| p.eq_ignore_ascii_case("HTTP/"));
    if !is_http {
        return Err(FailureReason::MalformedRequestLine);
    }

    Ok((method, path, protocol))
}

/// RFC 9110 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
