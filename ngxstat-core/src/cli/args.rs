use crate::conf::{
    AnalyzerConfig, ConfigError, ConfigOverrides, ValidationReport, resolve_config,
};
use crate::ingest::RecordFilter;
use crate::normalize::StatusPolicy;
use crate::parse::LogFormat;
use crate::render::{OutputFormat, RecordFormat};
use clap::Args;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Inputs and settings shared by every command that reads logs.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Log files, glob patterns, or `-` for stdin
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<String>,

    /// TOML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log line grammar
    #[arg(long, value_enum)]
    pub format: Option<LogFormat>,

    /// Extra timestamp pattern, tried after the configured ones (repeatable)
    #[arg(long = "timestamp-format", value_name = "PATTERN")]
    pub timestamp_formats: Vec<String>,

    /// Reject lines longer than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_line_length: Option<usize>,

    /// How to treat status codes outside 100-599
    #[arg(long, value_enum)]
    pub out_of_range_status: Option<StatusPolicy>,

    /// Exit with status 3 if any line fails to parse
    #[arg(long)]
    pub strict: bool,

    /// Only count records whose status contains this text
    #[arg(long, value_name = "TEXT")]
    pub filter_status: Option<String>,

    /// Only count records whose client address contains this text
    #[arg(long, value_name = "TEXT")]
    pub filter_ip: Option<String>,

    /// Only count records whose path contains this text
    #[arg(long, value_name = "TEXT")]
    pub filter_path: Option<String>,

    /// Log every unparseable line to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl AnalyzeArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            format: self.format,
            max_line_length: self.max_line_length,
            out_of_range_status: self.out_of_range_status,
            extra_timestamp_formats: self.timestamp_formats.clone(),
            strict: self.strict,
            ..ConfigOverrides::default()
        }
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter::new(
            self.filter_status.as_deref(),
            self.filter_ip.as_deref(),
            self.filter_path.as_deref(),
        )
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Addresses and paths reported per ranking
    #[arg(long, value_name = "N")]
    pub top_k: Option<usize>,

    /// Request-rate bucket width, e.g. 30s, 5m, 1h
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub bucket: Option<Duration>,

    /// Report format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Aggregate inputs concurrently and merge the results
    #[arg(long)]
    pub parallel: bool,

    /// Never color the text report
    #[arg(long)]
    pub no_color: bool,
}

impl StatsArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            top_k: self.top_k,
            bucket: self.bucket,
            ..self.analyze.overrides()
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecordsArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Stop after writing this many records
    #[arg(long, value_name = "N")]
    pub limit: Option<u64>,

    /// Export format
    #[arg(long, value_enum, default_value_t = RecordFormat::Jsonl)]
    pub output: RecordFormat,

    /// Write records to this file instead of stdout
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,
}

/// Resolves the effective config, printing validation problems to stderr.
///
/// `Ok(None)` means the config was invalid and the report has been shown.
pub(crate) fn resolve_or_report(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<Option<AnalyzerConfig>> {
    match resolve_config(path, overrides) {
        Ok(cfg) => Ok(Some(cfg)),
        Err(ConfigError::Validation { report }) => {
            print_report(&report);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn print_report(report: &ValidationReport) {
    if std::io::stderr().is_terminal() {
        eprint!("{}", report.render_pretty());
    } else {
        eprint!("{}", report.render_plain());
    }
}
