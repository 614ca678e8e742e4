use crate::cli::args::resolve_or_report;
use crate::cli::{ExitStatus, RecordsArgs};
use crate::ingest::{IngestDriver, IngestError, expand_inputs};
use crate::normalize::{LogRecord, TimestampPattern};
use crate::render::{CsvRecordWriter, RecordFormat, write_record_line};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::{info, warn};

/// Streams parsed records as JSON lines or CSV, in input order, to stdout
/// or `--output-file`.
///
/// Failed lines are skipped (and logged with `--verbose`). Nothing is held in
/// memory beyond the line being written.
pub fn run_records(args: &RecordsArgs, cancel: Arc<AtomicBool>) -> Result<ExitStatus> {
    let Some(cfg) = resolve_or_report(args.analyze.config.as_deref(), &args.analyze.overrides())?
    else {
        return Ok(ExitStatus::Failure);
    };

    let filter = args.analyze.filter();
    let driver = IngestDriver::new(&cfg)
        .with_verbose(args.analyze.verbose)
        .with_cancel(cancel);

    let time = driver.parser().timestamp_pattern().clone();
    let mut out = RecordSink::open(args.output, args.output_file.as_deref(), time)?;

    let mut written = 0u64;
    let mut failed = 0u64;
    let mut io_failure = false;
    let mut write_error: Option<io::Error> = None;

    for source in expand_inputs(&args.analyze.inputs) {
        if args.limit.is_some_and(|limit| written >= limit) || driver.is_cancelled() {
            break;
        }

        let input = source.label();
        let result = source.open().and_then(|reader| {
            driver.stream(&input, reader, |outcome| {
                let record = match outcome {
                    Ok(record) => record,
                    Err(_) => {
                        failed += 1;
                        return ControlFlow::Continue(());
                    }
                };
                if !filter.matches(&record) {
                    return ControlFlow::Continue(());
                }
                if let Err(e) = out.write(&record) {
                    write_error = Some(e);
                    return ControlFlow::Break(());
                }
                written += 1;
                if args.limit.is_some_and(|limit| written >= limit) {
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            })
        });

        if let Err(err) = result {
            report_input_error(&err);
            io_failure = true;
        }
        if write_error.is_some() {
            break;
        }
    }

    let flushed = match write_error {
        Some(e) => Err(e),
        None => out.flush(),
    };
    match flushed {
        // Downstream closed early (`| head`); not an error for a pipeline.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(ExitStatus::Success),
        Err(e) => return Err(e.into()),
        Ok(()) => {}
    }

    if let Some(path) = &args.output_file {
        info!(records = written, output = %path.display(), "records written");
    }

    if io_failure {
        return Ok(ExitStatus::Failure);
    }
    if driver.is_cancelled() {
        return Ok(ExitStatus::Interrupted);
    }
    if cfg.strict && failed > 0 {
        eprintln!("ngxstat: {failed} line(s) failed to parse (strict mode)");
        return Ok(ExitStatus::StrictViolation);
    }

    Ok(ExitStatus::Success)
}

enum RecordSink {
    Jsonl(BufWriter<Box<dyn Write>>),
    Csv(CsvRecordWriter<Box<dyn Write>>),
}

impl RecordSink {
    fn open(format: RecordFormat, path: Option<&Path>, time: TimestampPattern) -> Result<Self> {
        let dest: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path).with_context(|| format!("creating {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };

        Ok(match format {
            RecordFormat::Jsonl => RecordSink::Jsonl(BufWriter::new(dest)),
            RecordFormat::Csv => RecordSink::Csv(CsvRecordWriter::new(dest, time)?),
        })
    }

    fn write(&mut self, record: &LogRecord) -> io::Result<()> {
        match self {
            RecordSink::Jsonl(out) => write_record_line(out, record),
            RecordSink::Csv(out) => out.write(record),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RecordSink::Jsonl(out) => out.flush(),
            RecordSink::Csv(out) => out.flush(),
        }
    }
}

fn report_input_error(err: &IngestError) {
    warn!(input = err.input().unwrap_or("-"), "input aborted");
    eprintln!("ngxstat: {err}");
}
