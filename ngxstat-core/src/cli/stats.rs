use crate::cli::args::resolve_or_report;
use crate::cli::{ExitStatus, StatsArgs};
use crate::ingest::{IngestDriver, RunReport, expand_inputs};
use crate::logging::default_color_mode;
use crate::render::{OutputFormat, TextOptions, render_json, render_text};
use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info};

/// Aggregates the inputs and prints the report to stdout.
///
/// The report is printed even when some inputs could not be read; those
/// errors go to stderr and turn the exit status into a failure.
pub fn run_stats(args: &StatsArgs, cancel: Arc<AtomicBool>) -> Result<ExitStatus> {
    let Some(cfg) = resolve_or_report(args.analyze.config.as_deref(), &args.overrides())? else {
        return Ok(ExitStatus::Failure);
    };

    let sources = expand_inputs(&args.analyze.inputs);
    debug!(inputs = sources.len(), format = %cfg.format, "starting stats run");

    let driver = IngestDriver::new(&cfg)
        .with_filter(args.analyze.filter())
        .with_verbose(args.analyze.verbose)
        .with_parallel(args.parallel)
        .with_cancel(cancel);

    let report = driver.run(&sources);

    let rendered = match args.output {
        OutputFormat::Text => {
            let opts = TextOptions {
                color: !args.no_color && default_color_mode(),
            };
            render_text(&report.snapshot, &report.sources, opts)
        }
        OutputFormat::Json => render_json(&report.snapshot, &report.sources)
            .context("failed to serialize report")?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered.trim_end()).context("failed to write report")?;

    Ok(exit_status(&report, cfg.strict))
}

/// I/O failures win over an interrupt, which wins over a strict-mode violation.
pub fn exit_status(report: &RunReport, strict: bool) -> ExitStatus {
    for err in &report.errors {
        eprintln!("ngxstat: {err}");
    }

    if report.has_io_errors() {
        return ExitStatus::Failure;
    }
    if report.cancelled {
        info!("interrupted, report covers the input read so far");
        return ExitStatus::Interrupted;
    }
    if strict && report.snapshot.has_failures() {
        eprintln!(
            "ngxstat: {} line(s) failed to parse (strict mode)",
            report.snapshot.failed
        );
        return ExitStatus::StrictViolation;
    }

    ExitStatus::Success
}
