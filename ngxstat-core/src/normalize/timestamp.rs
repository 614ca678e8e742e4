use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// nginx `$time_local`, e.g. `10/Oct/2023:13:55:36 +0000`.
pub const NGINX_TIME_LOCAL: &str = "%d/%b/%Y:%H:%M:%S %z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampPattern {
    /// RFC 3339 / nginx `$time_iso8601`.
    Rfc3339,
    /// strftime pattern carrying its own offset.
    WithOffset(String),
    /// strftime pattern without an offset; read as UTC.
    Utc(String),
}

impl TimestampPattern {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern.eq_ignore_ascii_case("rfc3339") || pattern.eq_ignore_ascii_case("iso8601") {
            TimestampPattern::Rfc3339
        } else if has_offset_specifier(pattern) {
            TimestampPattern::WithOffset(pattern.to_string())
        } else {
            TimestampPattern::Utc(pattern.to_string())
        }
    }

    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            TimestampPattern::Rfc3339 => DateTime::parse_from_rfc3339(raw).ok(),
            TimestampPattern::WithOffset(fmt) => DateTime::parse_from_str(raw, fmt).ok(),
            TimestampPattern::Utc(fmt) => NaiveDateTime::parse_from_str(raw, fmt)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset()),
        }
    }

    pub fn format(&self, ts: &DateTime<FixedOffset>) -> String {
        match self {
            TimestampPattern::Rfc3339 => ts.to_rfc3339(),
            TimestampPattern::WithOffset(fmt) | TimestampPattern::Utc(fmt) => {
                ts.format(fmt).to_string()
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TimestampPattern::Rfc3339 => "rfc3339",
            TimestampPattern::WithOffset(fmt) | TimestampPattern::Utc(fmt) => fmt,
        }
    }
}

fn has_offset_specifier(pattern: &str) -> bool {
    ["%z", "%:z", "%::z", "%:::z", "%#z"]
        .iter()
        .any(|spec| pattern.contains(spec))
}

/// Whether chrono accepts `pattern` as a strftime format (keywords pass).
pub fn is_valid_pattern(pattern: &str) -> bool {
    match TimestampPattern::new(pattern) {
        TimestampPattern::Rfc3339 => true,
        TimestampPattern::WithOffset(fmt) | TimestampPattern::Utc(fmt) => {
            !fmt.is_empty() && !StrftimeItems::new(&fmt).any(|item| matches!(item, Item::Error))
        }
    }
}

/// Ordered timestamp patterns; the first one that matches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParser {
    patterns: Vec<TimestampPattern>,
}

impl TimestampParser {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<_> = patterns
            .into_iter()
            .map(|p| TimestampPattern::new(p.as_ref()))
            .collect();

        if patterns.is_empty() {
            return Self::default();
        }
        Self { patterns }
    }

    pub fn parse(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        self.patterns.iter().find_map(|p| p.parse(raw))
    }

    pub fn patterns(&self) -> &[TimestampPattern] {
        &self.patterns
    }

    /// The first configured pattern; what timestamps are written back out in.
    pub fn primary(&self) -> &TimestampPattern {
        // `new` falls back to the default list, so this is never empty.
        &self.patterns[0]
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self {
            patterns: vec![TimestampPattern::new(NGINX_TIME_LOCAL)],
        }
    }
}
