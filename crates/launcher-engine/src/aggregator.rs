//! Results aggregation and report formatting.

use crate::metrics::{
    rate, success_rate, AggregatedReport, EnvironmentInfo, MissingWorker, WorkerReport,
};
use chrono::Utc;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::time::Duration;

/// Output format for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
    Markdown,
}

/// Inputs to [`aggregate_reports`] besides the worker reports themselves.
#[derive(Debug, Clone)]
pub struct AggregationContext {
    pub endpoint: String,
    pub expected_workers: usize,
    pub wall_clock: Duration,
    pub tracked: bool,
    pub environment: Option<EnvironmentInfo>,
    /// Failures reported by workers that never sent `Done`
    pub worker_errors: Vec<(usize, String)>,
}

/// Fold worker reports into one aggregate. Workers are numbered `1..=expected_workers`;
/// any id without a report is listed as missing.
pub fn aggregate_reports(
    mut workers: Vec<WorkerReport>,
    ctx: AggregationContext,
) -> AggregatedReport {
    workers.sort_by_key(|w| w.worker_id);

    let total_sent: u64 = workers.iter().map(|w| w.sent).sum();
    let total_ok: u64 = workers.iter().map(|w| w.ok).sum();
    let total_fail: u64 = workers.iter().map(|w| w.fail).sum();

    let missing_workers = (1..=ctx.expected_workers)
        .filter(|id| !workers.iter().any(|w| w.worker_id == *id))
        .map(|worker_id| MissingWorker {
            worker_id,
            error: ctx
                .worker_errors
                .iter()
                .find(|(id, _)| *id == worker_id)
                .map(|(_, e)| e.clone()),
        })
        .collect();

    let wall_clock_duration_secs = ctx.wall_clock.as_secs_f64();

    let mut report = AggregatedReport {
        endpoint: ctx.endpoint,
        expected_workers: ctx.expected_workers,
        reported_workers: workers.len(),
        missing_workers,
        total_sent,
        total_ok,
        total_fail,
        success_rate: success_rate(ctx.tracked, total_ok, total_fail),
        wall_clock_duration_secs,
        aggregate_requests_per_second: 0.0,
        tracked: ctx.tracked,
        environment: ctx.environment,
        workers,
        aggregated_at: Utc::now(),
    };
    report.aggregate_requests_per_second =
        rate(report.total_attempts(), wall_clock_duration_secs);
    report
}

/// Render a report in the requested format.
pub fn render(report: &AggregatedReport, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Table => format_table(report),
        OutputFormat::Markdown => format_markdown(report),
    })
}

/// Format aggregated report as a table.
pub fn format_table(report: &AggregatedReport) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Worker", "Seed", "Sent", "OK", "Failed", "Success", "Duration", "Req/sec",
    ]);

    for worker in &report.workers {
        table.add_row(vec![
            Cell::new(worker.worker_id),
            Cell::new(worker.seed),
            Cell::new(format_number(worker.sent)),
            Cell::new(counted(worker.tracked, worker.ok)),
            Cell::new(counted(worker.tracked, worker.fail)),
            rate_cell(worker.success_rate()),
            Cell::new(format_duration(worker.duration_secs())),
            Cell::new(format!("{:.1}", worker.requests_per_second())),
        ]);
    }

    for missing in &report.missing_workers {
        table.add_row(vec![
            Cell::new(missing.worker_id),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("MISSING").fg(Color::Red),
            Cell::new("-"),
            Cell::new("-"),
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format!(
            "{}/{}",
            report.reported_workers, report.expected_workers
        )),
        Cell::new(format_number(report.total_sent)),
        Cell::new(counted(report.tracked, report.total_ok)),
        Cell::new(counted(report.tracked, report.total_fail)),
        rate_cell(report.success_rate),
        Cell::new(format!(
            "{}*",
            format_duration(report.wall_clock_duration_secs)
        )),
        Cell::new(format!("{:.1}†", report.aggregate_requests_per_second)),
    ]);

    output.push_str(&format!("Endpoint: {}\n", report.endpoint));
    output.push_str(&table.to_string());
    output.push_str("\n* Wall clock (parallel)  † Aggregate throughput\n");

    if !report.tracked {
        output.push_str("Outcomes were not tracked (fire-and-forget).\n");
    }

    if !report.missing_workers.is_empty() {
        output.push_str("\nMissing Workers:\n");
        for missing in &report.missing_workers {
            output.push_str(&format!(
                "  {}: {}\n",
                missing.worker_id,
                missing.error.as_deref().unwrap_or("no report received")
            ));
        }
    }

    output
}

/// Format aggregated report as markdown.
pub fn format_markdown(report: &AggregatedReport) -> String {
    let mut output = String::new();

    output.push_str("# Traffic Launch Results\n\n");
    output.push_str(&format!(
        "**Aggregated at:** {}\n\n",
        report.aggregated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("## Summary\n\n");
    output.push_str(&format!("- **Endpoint:** {}\n", report.endpoint));
    output.push_str(&format!(
        "- **Workers:** {}/{}\n",
        report.reported_workers, report.expected_workers
    ));
    output.push_str(&format!(
        "- **Sent:** {}\n",
        format_number(report.total_sent)
    ));
    if report.tracked {
        output.push_str(&format!("- **OK:** {}\n", format_number(report.total_ok)));
        output.push_str(&format!(
            "- **Failed:** {}\n",
            format_number(report.total_fail)
        ));
    }
    output.push_str(&format!(
        "- **Success Rate:** {}\n",
        format_rate(report.success_rate)
    ));
    output.push_str(&format!(
        "- **Wall Clock Duration:** {}\n",
        format_duration(report.wall_clock_duration_secs)
    ));
    output.push_str(&format!(
        "- **Aggregate Throughput:** {:.1} req/sec\n\n",
        report.aggregate_requests_per_second
    ));

    output.push_str("## Worker Details\n\n");
    output.push_str("| Worker | Seed | Sent | OK | Failed | Success | Duration | Req/sec |\n");
    output.push_str("|--------|------|------|----|--------|---------|----------|---------|\n");

    for worker in &report.workers {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {:.1} |\n",
            worker.worker_id,
            worker.seed,
            format_number(worker.sent),
            counted(worker.tracked, worker.ok),
            counted(worker.tracked, worker.fail),
            format_rate(worker.success_rate()),
            format_duration(worker.duration_secs()),
            worker.requests_per_second()
        ));
    }

    if !report.missing_workers.is_empty() {
        output.push_str("\n## Missing Workers\n\n");
        for missing in &report.missing_workers {
            output.push_str(&format!(
                "- **{}:** {}\n",
                missing.worker_id,
                missing.error.as_deref().unwrap_or("no report received")
            ));
        }
    }

    output
}

fn counted(tracked: bool, n: u64) -> String {
    if tracked {
        format_number(n)
    } else {
        "-".to_string()
    }
}

fn rate_cell(rate: Option<f64>) -> Cell {
    match rate {
        Some(r) if r >= 0.99 => Cell::new(format_rate(rate)).fg(Color::Green),
        Some(r) if r < 0.9 => Cell::new(format_rate(rate)).fg(Color::Red),
        _ => Cell::new(format_rate(rate)),
    }
}

/// Format a ratio as a percentage with two decimals.
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.2}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

/// Format duration in human-readable format.
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    } else {
        let hours = (secs / 3600.0).floor();
        let remaining = secs - (hours * 3600.0);
        let mins = (remaining / 60.0).floor();
        format!("{}h {:02.0}m", hours as u64, mins as u64)
    }
}

/// Format number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
