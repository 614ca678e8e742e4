use crate::ingest::SourceSummary;
use crate::parse::FailureReason;
use crate::stats::{AggregateSnapshot, RankedEntry};
use owo_colors::OwoColorize;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    pub color: bool,
}

/// Human-readable report. Sections with nothing to show are left out.
pub fn render_text(
    snapshot: &AggregateSnapshot,
    sources: &[SourceSummary],
    opts: TextOptions,
) -> String {
    let mut out = String::new();

    let title = "ngxstat report";
    if opts.color {
        out.push_str(&format!("{}\n", title.bold()));
    } else {
        out.push_str(&format!("{title}\n"));
    }

    out.push_str(&format!(
        "==============\n\
         lines: {} | parsed: {} | failed: {} ({:.1}%) | filtered: {}\n\
         bytes sent: {}\n",
        snapshot.lines_seen,
        snapshot.parsed,
        snapshot.failed,
        snapshot.failure_rate() * 100.0,
        snapshot.filtered_out,
        snapshot.bytes_sent
    ));

    if let (Some(first), Some(last)) = (snapshot.first_timestamp, snapshot.last_timestamp) {
        out.push_str(&format!(
            "span: {} .. {}\n",
            first.to_rfc3339(),
            last.to_rfc3339()
        ));
    }
    if let Some(rps) = snapshot.requests_per_second() {
        out.push_str(&format!("rate: {rps:.2} req/s\n"));
    }

    if sources.len() > 1 || sources.iter().any(|s| !s.completed) {
        out.push_str("\nInputs:\n");
        for s in sources {
            let state = if s.completed { "" } else { " (incomplete)" };
            out.push_str(&format!(
                "  {:<32} lines={} failed={}{}\n",
                s.input, s.lines, s.failed, state
            ));
        }
    }

    render_status(&mut out, snapshot, opts);
    render_failures(&mut out, snapshot);

    render_ranking(&mut out, "Top clients", &snapshot.top_clients, snapshot.top_k_exact);
    render_ranking(&mut out, "Top paths", &snapshot.top_paths, snapshot.top_k_exact);
    render_ranking(
        &mut out,
        "Methods",
        &snapshot.top_methods,
        snapshot.top_methods_exact,
    );

    if !snapshot.buckets.is_empty() {
        out.push_str(&format!("\nRequests per {}s:\n", snapshot.bucket_width_secs));
        let peak = snapshot.buckets.iter().map(|b| b.requests).max().unwrap_or(0);
        for b in &snapshot.buckets {
            out.push_str(&format!(
                "  {}  {:<width$} {:>8}\n",
                b.start.format("%Y-%m-%d %H:%M:%S"),
                bar(b.requests, peak),
                b.requests,
                width = BAR_WIDTH
            ));
        }
    }

    if let Some(latency) = &snapshot.latency {
        out.push_str("\nUpstream latency:\n");
        for b in &latency.buckets {
            let pct = b.count as f64 / latency.samples as f64 * 100.0;
            out.push_str(&format!(
                "  {:<8} {:<width$} {:>5.1}%\n",
                b.label,
                bar(b.count, latency.samples),
                pct,
                width = BAR_WIDTH
            ));
        }
        out.push_str(&format!(
            "  p50 ≈ {}ms | p95 ≈ {}ms | p99 ≈ {}ms\n",
            latency.p50_ms, latency.p95_ms, latency.p99_ms
        ));
    }

    out
}

fn render_status(out: &mut String, snapshot: &AggregateSnapshot, opts: TextOptions) {
    if snapshot.status.is_empty() {
        return;
    }

    let c = &snapshot.status_classes;
    out.push_str(&format!(
        "\nStatus: 1xx={} 2xx={} 3xx={} 4xx={} 5xx={} other={}\n",
        c.informational, c.success, c.redirection, c.client_error, c.server_error, c.out_of_range
    ));

    let peak = snapshot.status.values().copied().max().unwrap_or(0);
    for (status, count) in &snapshot.status {
        let code = format!("{status:03}");
        let code = if !opts.color {
            code
        } else {
            match status {
                200..=299 => code.green().to_string(),
                300..=399 => code.cyan().to_string(),
                400..=499 => code.yellow().to_string(),
                500..=599 => code.red().to_string(),
                _ => code.dimmed().to_string(),
            }
        };
        out.push_str(&format!(
            "  {code}  {:<width$} {count:>8}\n",
            bar(*count, peak),
            width = BAR_WIDTH
        ));
    }
}

fn render_failures(out: &mut String, snapshot: &AggregateSnapshot) {
    if !snapshot.has_failures() {
        return;
    }

    out.push_str("\nUnparseable lines:\n");
    for reason in FailureReason::ALL {
        let count = snapshot.failures_by_reason.get(&reason).copied().unwrap_or(0);
        if count > 0 {
            out.push_str(&format!("  {:<24} {count:>8}\n", reason.as_str()));
        }
    }
}

fn render_ranking(out: &mut String, title: &str, entries: &[RankedEntry], exact: bool) {
    if entries.is_empty() {
        return;
    }

    let marker = if exact { "" } else { " (approximate)" };
    out.push_str(&format!("\n{title}{marker}:\n"));
    for (rank, e) in entries.iter().enumerate() {
        out.push_str(&format!("  {:>3}. {:<48} {:>8}", rank + 1, e.key, e.count));
        if e.error > 0 {
            out.push_str(&format!(" (±{})", e.error));
        }
        out.push('\n');
    }
}

fn bar(count: u64, total: u64) -> String {
    if total == 0 || count == 0 {
        return String::new();
    }
    let len = ((count as f64 / total as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}
