use crate::parse::tests::EXAMPLE_LINE;
use crate::parse::{FailureReason, LogFormat};
use pretty_assertions::assert_eq;

const UPSTREAM_LINE: &str = r#"10.0.0.7 - alice [10/Oct/2023:13:55:36 +0000] "POST /api/v1/items?x=1 HTTP/2.0" 201 48 "https://example.com/" "curl/8.0" 512 0.042 [default-api-80] [] 10.1.2.3:8080 48 0.040 201 5f2c0f3a"#;

//-----------------------------------------------------------------------------
// Common / combined
//-----------------------------------------------------------------------------

#[test]
fn combined_line_yields_all_fields() {
    // Act
    let fields = LogFormat::Combined.tokenize(EXAMPLE_LINE).unwrap();

    // Assert
    assert_eq!(fields.remote_addr, "192.0.2.1");
    assert_eq!(fields.remote_user, "-");
    assert_eq!(fields.time_local, "10/Oct/2023:13:55:36 +0000");
    assert_eq!(fields.method, "GET");
    assert_eq!(fields.path, "/index.html");
    assert_eq!(fields.protocol, "HTTP/1.1");
    assert_eq!(fields.status, "200");
    assert_eq!(fields.body_bytes_sent, "612");
    assert_eq!(fields.referrer, Some("-"));
    assert_eq!(fields.user_agent, Some("Mozilla/5.0"));
    assert!(fields.upstream.is_none());
}

#[test]
fn common_format_ignores_referrer_and_agent() {
    let fields = LogFormat::Common.tokenize(EXAMPLE_LINE).unwrap();

    assert_eq!(fields.referrer, None);
    assert_eq!(fields.user_agent, None);
}

#[test]
fn combined_requires_referrer_and_agent() {
    // Arrange
    let line = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 612"#;

    // Act
    let result = LogFormat::Combined.tokenize(line);

    // Assert
    assert_eq!(result, Err(FailureReason::TruncatedLine));
}

#[test]
fn trailing_fields_are_ignored() {
    let line = format!("{EXAMPLE_LINE} \"extra\" 0.123");

    let fields = LogFormat::Combined.tokenize(&line).unwrap();

    assert_eq!(fields.user_agent, Some("Mozilla/5.0"));
}

//-----------------------------------------------------------------------------
// Shape checks
//-----------------------------------------------------------------------------

#[test]
fn request_line_needs_three_tokens() {
    let line = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET /" 200 612 "-" "-""#;

    assert_eq!(
        LogFormat::Combined.tokenize(line),
        Err(FailureReason::MalformedRequestLine)
    );
}

#[test]
fn request_line_needs_http_protocol() {
    let line = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET / FTP/1.0" 200 612 "-" "-""#;

    assert_eq!(
        LogFormat::Combined.tokenize(line),
        Err(FailureReason::MalformedRequestLine)
    );
}

#[test]
fn garbage_request_is_malformed() {
    // nginx logs raw bytes for requests it could not parse
    let line = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "\x16\x03\x01" 400 157 "-" "-""#;

    assert_eq!(
        LogFormat::Combined.tokenize(line),
        Err(FailureReason::MalformedRequestLine)
    );
}

#[test]
fn status_must_be_three_digits() {
    for status in ["abc", "20", "2000", "2x0"] {
        let line = format!(
            r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" {status} 612 "-" "-""#
        );

        assert_eq!(
            LogFormat::Combined.tokenize(&line),
            Err(FailureReason::InvalidStatusCode),
            "status {status}"
        );
    }
}

#[test]
fn size_must_be_digits_or_dash() {
    let line = r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 12k "-" "-""#;

    assert_eq!(
        LogFormat::Combined.tokenize(line),
        Err(FailureReason::InvalidSizeField)
    );
}

#[test]
fn malformed_request_wins_over_later_fields() {
    let lines = [
        r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GARBAGE" abc 0 "-" "-""#,
        r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GET /x" 200 12k "-" "-""#,
        r#"192.0.2.1 - - [10/Oct/2023:13:55:36 +0000] "GARBAGE""#,
    ];

    for line in lines {
        assert_eq!(
            LogFormat::Combined.tokenize(line),
            Err(FailureReason::MalformedRequestLine),
            "line {line}"
        );
    }
}

#[test]
fn unbracketed_timestamp_is_invalid() {
    let line = r#"192.0.2.1 - - 10/Oct/2023:13:55:36 "GET / HTTP/1.1" 200 612 "-" "-""#;

    assert_eq!(
        LogFormat::Combined.tokenize(line),
        Err(FailureReason::InvalidTimestamp)
    );
}

//-----------------------------------------------------------------------------
// Upstream
//-----------------------------------------------------------------------------

#[test]
fn upstream_line_yields_upstream_fields() {
    // Act
    let fields = LogFormat::Upstream.tokenize(UPSTREAM_LINE).unwrap();

    // Assert
    let up = fields.upstream.expect("upstream fields");
    assert_eq!(up.request_length, "512");
    assert_eq!(up.request_time, "0.042");
    assert_eq!(up.upstream_name, "default-api-80");
    assert_eq!(up.upstream_addr_list, "");
    assert_eq!(up.upstream_addr, "10.1.2.3:8080");
    assert_eq!(up.upstream_status, "201");
    assert_eq!(up.request_id, "5f2c0f3a");
}

#[test]
fn upstream_format_rejects_plain_combined_lines() {
    assert_eq!(
        LogFormat::Upstream.tokenize(EXAMPLE_LINE),
        Err(FailureReason::TruncatedLine)
    );
}
