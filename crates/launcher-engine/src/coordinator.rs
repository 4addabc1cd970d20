//! Spawns workers and folds their reports.
//!
//! Every worker runs on its own OS thread with a single-threaded tokio
//! runtime, so workers use separate cores while each one multiplexes its
//! requests without blocking. Workers never share state; the only link back
//! to the coordinator is one message on an unbounded channel.

use crate::aggregator::{aggregate_reports, AggregationContext};
use crate::config::LaunchConfig;
use crate::environment::{check_worker_count, log_runtime_environment};
use crate::error::IncompleteRun;
use crate::metrics::{AggregatedReport, WorkerMessage, WorkerReport};
use crate::worker::WorkerLoop;
use anyhow::{Context, Result};
use event_dispatch::{HttpTransport, Transport};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

/// Reports gathered from the worker channel.
#[derive(Debug, Default)]
pub struct CollectedReports {
    pub reports: Vec<WorkerReport>,
    /// Workers that reported a failure instead of a result
    pub failures: Vec<(usize, String)>,
    /// Every sender was dropped before all workers reported
    pub channel_closed: bool,
    /// The report timeout elapsed
    pub timed_out: bool,
}

impl CollectedReports {
    pub fn received(&self) -> usize {
        self.reports.len()
    }
}

/// Receive worker messages until `expected` workers have answered, every
/// sender is gone, or `timeout` elapses. Duplicate messages from a worker
/// are ignored.
pub async fn collect_reports(
    rx: &mut UnboundedReceiver<WorkerMessage>,
    expected: usize,
    timeout: Option<Duration>,
) -> CollectedReports {
    let deadline = timeout.map(|t| tokio::time::Instant::now() + t);
    let mut seen = HashSet::new();
    let mut collected = CollectedReports::default();

    while seen.len() < expected {
        let next = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, rx.recv()).await {
                Ok(next) => next,
                Err(_) => {
                    warn!(
                        "Report timeout reached. Received {}/{} worker reports.",
                        seen.len(),
                        expected
                    );
                    collected.timed_out = true;
                    break;
                }
            },
            None => rx.recv().await,
        };

        let Some(message) = next else {
            warn!(
                "All workers exited but only {}/{} reported",
                seen.len(),
                expected
            );
            collected.channel_closed = true;
            break;
        };

        let worker_id = message.worker_id();
        if !seen.insert(worker_id) {
            warn!("Ignoring duplicate message from worker {worker_id}");
            continue;
        }

        match message {
            WorkerMessage::Done(report) => {
                info!(
                    "Worker {} reported: ok {}, fail {} ({}/{})",
                    worker_id,
                    report.ok,
                    report.fail,
                    seen.len(),
                    expected
                );
                collected.reports.push(report);
            }
            WorkerMessage::Failed { worker_id, error } => {
                error!("Worker {worker_id} failed: {error}");
                collected.failures.push((worker_id, error));
            }
        }
    }

    collected
}

/// Runs a launch across `worker_count` workers.
pub struct Coordinator {
    config: Arc<LaunchConfig>,
}

impl Coordinator {
    pub fn new(config: LaunchConfig) -> Result<Self> {
        config.validate().context("Invalid launch configuration")?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Run every worker against the configured HTTP endpoint.
    pub async fn run(&self) -> Result<AggregatedReport> {
        self.run_with(|_, config: &LaunchConfig| {
            Ok(HttpTransport::new(config.endpoint.clone(), &config.pool)?)
        })
        .await
    }

    /// Run every worker with a transport from `make_transport`, called once
    /// per worker on that worker's thread.
    ///
    /// Returns [`IncompleteRun`] (carrying the partial report) when any worker
    /// fails to report.
    pub async fn run_with<T, F>(&self, make_transport: F) -> Result<AggregatedReport>
    where
        T: Transport + 'static,
        F: Fn(usize, &LaunchConfig) -> Result<T> + Send + Sync + 'static,
    {
        let config = &self.config;
        let environment = log_runtime_environment();
        for warning in check_worker_count(config.worker_count, &environment) {
            warn!("{warning}");
        }

        info!("Endpoint: {}", config.endpoint);
        info!("Mode: {}", config.termination);
        info!(
            "Workers: {}, batch size: {}, concurrency: {}, schema: {}, tracked: {}",
            config.worker_count,
            config.batch_size,
            config.concurrency,
            config.schema,
            config.track_outcomes
        );
        if let Some(quota) = config.per_worker_quota() {
            info!("Per-worker quota: {quota}");
            let remainder = config.unsent_remainder();
            if remainder > 0 {
                warn!("{remainder} requests will not be sent (total not divisible by worker count)");
            }
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let handles = spawn_workers(Arc::clone(config), Arc::new(make_transport), tx)?;

        let collected = collect_reports(&mut rx, config.worker_count, config.report_timeout).await;
        let wall_clock = start.elapsed();

        let complete = collected.received() == config.worker_count;
        let report = aggregate_reports(
            collected.reports,
            AggregationContext {
                endpoint: config.endpoint.clone(),
                expected_workers: config.worker_count,
                wall_clock,
                tracked: config.track_outcomes,
                environment: Some(environment),
                worker_errors: collected.failures,
            },
        );

        info!(
            "Launch finished in {:.2}s: ok {}, fail {}, {:.0} req/sec",
            report.wall_clock_duration_secs,
            report.total_ok,
            report.total_fail,
            report.aggregate_requests_per_second
        );

        if complete {
            join_workers(handles).await;
            Ok(report)
        } else {
            let missing: Vec<usize> = report.missing_workers.iter().map(|m| m.worker_id).collect();
            Err(IncompleteRun {
                expected: config.worker_count,
                received: report.reported_workers,
                missing,
                report: Box::new(report),
            }
            .into())
        }
    }
}

fn spawn_workers<T, F>(
    config: Arc<LaunchConfig>,
    make_transport: Arc<F>,
    tx: UnboundedSender<WorkerMessage>,
) -> Result<Vec<thread::JoinHandle<()>>>
where
    T: Transport + 'static,
    F: Fn(usize, &LaunchConfig) -> Result<T> + Send + Sync + 'static,
{
    let mut handles = Vec::with_capacity(config.worker_count);
    for worker_id in 1..=config.worker_count {
        let config = Arc::clone(&config);
        let make_transport = Arc::clone(&make_transport);
        let tx = tx.clone();

        let handle = thread::Builder::new()
            .name(format!("worker-{worker_id}"))
            .spawn(move || {
                let message = match run_worker_thread(worker_id, config, make_transport.as_ref()) {
                    Ok(report) => WorkerMessage::Done(report),
                    Err(e) => WorkerMessage::Failed {
                        worker_id,
                        error: format!("{e:#}"),
                    },
                };
                if tx.send(message).is_err() {
                    debug!("Coordinator stopped listening before worker {worker_id} reported");
                }
            })
            .with_context(|| format!("Failed to spawn thread for worker {worker_id}"))?;
        handles.push(handle);
    }
    Ok(handles)
}

fn run_worker_thread<T, F>(
    worker_id: usize,
    config: Arc<LaunchConfig>,
    make_transport: &F,
) -> Result<WorkerReport>
where
    T: Transport + 'static,
    F: Fn(usize, &LaunchConfig) -> Result<T>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| format!("Failed to build runtime for worker {worker_id}"))?;

    runtime.block_on(async move {
        let transport = make_transport(worker_id, config.as_ref())
            .with_context(|| format!("Failed to build transport for worker {worker_id}"))?;
        let worker = WorkerLoop::new(worker_id, config, transport)?;
        Ok(worker.run().await)
    })
}

async fn join_workers(handles: Vec<thread::JoinHandle<()>>) {
    let joined = tokio::task::spawn_blocking(move || {
        handles
            .into_iter()
            .filter_map(|h| h.join().err())
            .count()
    })
    .await;

    match joined {
        Ok(0) => {}
        Ok(panicked) => warn!("{panicked} worker threads panicked after reporting"),
        Err(e) => warn!("Failed to join worker threads: {e}"),
    }
}
