use crate::conf::AnalyzerConfig;
use crate::ingest::{IngestError, InputSource, LineReader, RecordFilter};
use crate::parse::{LineParser, ParseOutcome, RawLine};
use crate::stats::{AggregateSnapshot, AggregatorSettings, StreamingAggregator};
use rayon::prelude::*;
use std::io::BufRead;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Where a single input stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamEnd {
    pub lines: u64,
    /// The sink or a cancellation stopped reading before end of input.
    pub stopped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub input: String,
    pub lines: u64,
    pub failed: u64,
    /// Read to the end, without I/O error or cancellation.
    pub completed: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub snapshot: AggregateSnapshot,
    pub sources: Vec<SourceSummary>,
    pub errors: Vec<IngestError>,
    pub cancelled: bool,
}

impl RunReport {
    pub fn has_io_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Drives inputs through the parser and into aggregators.
#[derive(Debug, Clone)]
pub struct IngestDriver {
    parser: LineParser,
    settings: AggregatorSettings,
    filter: RecordFilter,
    verbose: bool,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl IngestDriver {
    pub fn new(cfg: &AnalyzerConfig) -> Self {
        Self {
            parser: LineParser::from_config(cfg),
            settings: AggregatorSettings::from_config(cfg),
            filter: RecordFilter::default(),
            verbose: false,
            parallel: false,
            cancel: None,
        }
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Emit a `warn` event for every unparseable line.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// One aggregator per input on the rayon pool, merged afterwards.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Checked before every line; once set, reading stops and the run
    /// reports what it has.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn parser(&self) -> &LineParser {
        &self.parser
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn run(&self, sources: &[InputSource]) -> RunReport {
        let mut aggregator = StreamingAggregator::new(self.settings.clone());
        let mut summaries = Vec::with_capacity(sources.len());
        let mut errors = Vec::new();

        if self.parallel && sources.len() > 1 {
            let results: Vec<_> = sources
                .par_iter()
                .map(|source| {
                    let mut local = StreamingAggregator::new(self.settings.clone());
                    let outcome = self.run_source(source, &mut local);
                    (local, outcome)
                })
                .collect();

            // Input order, so the merged rankings are deterministic.
            for (local, (summary, error)) in results {
                aggregator.merge(local);
                summaries.push(summary);
                errors.extend(error);
            }
        } else {
            for source in sources {
                if self.is_cancelled() {
                    break;
                }
                let (summary, error) = self.run_source(source, &mut aggregator);
                summaries.push(summary);
                errors.extend(error);
            }
        }

        RunReport {
            snapshot: aggregator.into_snapshot(),
            sources: summaries,
            errors,
            cancelled: self.is_cancelled(),
        }
    }

    fn run_source(
        &self,
        source: &InputSource,
        aggregator: &mut StreamingAggregator,
    ) -> (SourceSummary, Option<IngestError>) {
        let input = source.label();
        let failed_before = aggregator.failed();

        let result = source
            .open()
            .and_then(|reader| self.aggregate(&input, reader, aggregator));

        let (lines, completed, error) = match result {
            Ok(end) => (end.lines, !end.stopped, None),
            Err(err) => {
                warn!(input = %input, error = %err, "input aborted");
                let lines = match &err {
                    IngestError::Read { line, .. } => *line,
                    _ => 0,
                };
                (lines, false, Some(err))
            }
        };

        let summary = SourceSummary {
            input,
            lines,
            failed: aggregator.failed() - failed_before,
            completed,
        };
        debug!(input = %summary.input, lines = summary.lines, failed = summary.failed, "input done");

        (summary, error)
    }

    /// Parses `reader` into `aggregator`, applying the record filter.
    pub fn aggregate<R: BufRead>(
        &self,
        input: &str,
        reader: R,
        aggregator: &mut StreamingAggregator,
    ) -> Result<StreamEnd, IngestError> {
        self.stream(input, reader, |outcome| {
            match &outcome {
                Ok(record) if !self.filter.matches(record) => aggregator.observe_filtered(record),
                _ => aggregator.observe(&outcome),
            }
            ControlFlow::Continue(())
        })
    }

    /// Parses `reader` line by line and hands every outcome to `sink`, in order.
    pub fn stream<R, F>(&self, input: &str, reader: R, mut sink: F) -> Result<StreamEnd, IngestError>
    where
        R: BufRead,
        F: FnMut(ParseOutcome) -> ControlFlow<()>,
    {
        let mut lines = LineReader::new(reader, self.parser.max_line_length());

        loop {
            if self.is_cancelled() {
                return Ok(StreamEnd {
                    lines: lines.line_number(),
                    stopped: true,
                });
            }

            let line_number = lines.line_number();
            let next = lines
                .next_line()
                .map_err(|e| IngestError::read(input, line_number, e))?;

            let Some(line) = next else {
                return Ok(StreamEnd {
                    lines: line_number,
                    stopped: false,
                });
            };

            let number = line.number;
            let outcome = self
                .parser
                .parse(&RawLine::new(number, &line.text).with_raw_len(line.raw_len));

            if let (true, Err(failure)) = (self.verbose, &outcome) {
                warn!(
                    target: "ngxstat::diagnostics",
                    input = %input,
                    line = failure.line_number,
                    reason = %failure.reason,
                    excerpt = %failure.excerpt,
                    "unparseable line"
                );
            }

            if sink(outcome).is_break() {
                return Ok(StreamEnd {
                    lines: number,
                    stopped: true,
                });
            }
        }
    }
}
