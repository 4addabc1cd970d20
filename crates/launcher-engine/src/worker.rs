//! Per-worker send loop.
//!
//! A worker owns its random source, schema, client pool and HTTP pool. Each
//! iteration schedules up to `concurrency` batches, runs them together and
//! waits for all of them before deciding whether to continue.

use crate::config::{LaunchConfig, TerminationMode};
use crate::metrics::{rate, success_rate, WorkerReport};
use anyhow::{Context, Result};
use chrono::Utc;
use event_dispatch::{BatchRunner, BatchTally, DispatchOutcome, Dispatcher, Transport};
use event_generator::{EventRecord, EventSchema, SeededRandom};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, trace, warn};

/// Pause between untracked iterations so spawned sends get polled.
const UNTRACKED_YIELD: Duration = Duration::from_millis(1);

pub struct WorkerLoop<T: Transport> {
    worker_id: usize,
    seed: u32,
    config: Arc<LaunchConfig>,
    dispatcher: Arc<Dispatcher<T>>,
    rng: SeededRandom,
    schema: Box<dyn EventSchema>,
}

impl<T: Transport + 'static> WorkerLoop<T> {
    pub fn new(worker_id: usize, config: Arc<LaunchConfig>, transport: T) -> Result<Self> {
        let seed = config.base_seed.wrapping_add(worker_id as u32);
        let mut rng = SeededRandom::for_worker(config.base_seed, worker_id as u32);
        let schema = config
            .schema
            .build(&mut rng, &config.schema_options)
            .with_context(|| format!("Worker {worker_id}: failed to build schema"))?;
        let dispatcher = Arc::new(Dispatcher::new(transport, config.dispatch));

        Ok(Self {
            worker_id,
            seed,
            config,
            dispatcher,
            rng,
            schema,
        })
    }

    /// Run until the termination condition holds and return the final report.
    pub async fn run(mut self) -> WorkerReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let track = self.config.track_outcomes;

        match self.config.termination {
            TerminationMode::Count { .. } => info!(
                "Worker {} started | count mode | target {} | seed {}",
                self.worker_id,
                self.quota(),
                self.seed
            ),
            TerminationMode::Duration(d) => info!(
                "Worker {} started | duration mode | target {:.1}s | seed {}",
                self.worker_id,
                d.as_secs_f64(),
                self.seed
            ),
        }

        let in_flight = Arc::new(Semaphore::new(self.config.in_flight_limit()));
        // `scheduled` drives termination; `sent` excludes untracked events
        // that never left the worker.
        let mut scheduled: u64 = 0;
        let mut sent: u64 = 0;
        let mut tally = BatchTally::default();

        while self.should_continue(scheduled, start) {
            let sizes = self.plan_iteration(scheduled);
            if sizes.is_empty() {
                break;
            }
            let planned = sizes.iter().sum::<usize>() as u64;

            if track {
                tally += self.run_tracked_iteration(&sizes).await;
                sent += planned;
            } else {
                sent += self.spawn_untracked_iteration(&sizes, &in_flight).await as u64;
                tokio::time::sleep(UNTRACKED_YIELD).await;
            }

            scheduled += planned;
            self.log_progress(sent, tally, start);
        }

        if sent < scheduled {
            warn!(
                "Worker {}: {} events could not be serialized and were not sent",
                self.worker_id,
                scheduled - sent
            );
        }

        if !track {
            self.drain(&in_flight).await;
        }

        let elapsed = start.elapsed();
        let report = WorkerReport {
            worker_id: self.worker_id,
            seed: self.seed,
            sent,
            ok: tally.success,
            fail: tally.failure,
            tracked: track,
            duration_ms: elapsed.as_millis() as u64,
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            "Worker {} finished | sent {} | ok {} | fail {} | success {} | avg RPS {:.0}",
            self.worker_id,
            report.sent,
            report.ok,
            report.fail,
            report
                .success_rate()
                .map(|r| format!("{:.2}%", r * 100.0))
                .unwrap_or_else(|| "-".to_string()),
            report.requests_per_second()
        );

        report
    }

    fn quota(&self) -> u64 {
        self.config.per_worker_quota().unwrap_or(0)
    }

    fn should_continue(&self, sent: u64, start: Instant) -> bool {
        match self.config.termination {
            TerminationMode::Count { .. } => sent < self.quota(),
            TerminationMode::Duration(d) => start.elapsed() < d,
        }
    }

    /// Batch sizes for the next iteration.
    fn plan_iteration(&self, sent: u64) -> Vec<usize> {
        let batch_size = self.config.batch_size;
        let concurrency = self.config.concurrency;

        match self.config.termination {
            TerminationMode::Count { .. } => {
                let mut remaining = self.quota().saturating_sub(sent);
                let mut sizes = Vec::with_capacity(concurrency);
                for _ in 0..concurrency {
                    if remaining == 0 {
                        break;
                    }
                    let n = remaining.min(batch_size as u64);
                    sizes.push(n as usize);
                    remaining -= n;
                }
                sizes
            }
            TerminationMode::Duration(_) => vec![batch_size; concurrency],
        }
    }

    fn synthesize(&mut self, n: usize) -> Vec<EventRecord> {
        let mut events = Vec::with_capacity(n);
        for _ in 0..n {
            events.push(self.schema.synthesize(&mut self.rng));
        }
        events
    }

    async fn run_tracked_iteration(&mut self, sizes: &[usize]) -> BatchTally {
        // Synthesis happens up front so the random stream is drawn in a fixed order.
        let batches: Vec<Vec<EventRecord>> = sizes.iter().map(|&n| self.synthesize(n)).collect();

        let runner = BatchRunner::new(&self.dispatcher);
        let results = join_all(batches.iter().map(|batch| runner.run_batch(batch))).await;

        results
            .into_iter()
            .fold(BatchTally::default(), |acc, tally| acc + tally)
    }

    /// Spawn the iteration's sends and return how many were dispatched.
    async fn spawn_untracked_iteration(
        &mut self,
        sizes: &[usize],
        in_flight: &Arc<Semaphore>,
    ) -> usize {
        let total: usize = sizes.iter().sum();
        let bodies = self
            .synthesize(total)
            .iter()
            .map(EventRecord::to_json_bytes)
            .collect();
        self.dispatch_untracked(bodies, in_flight).await
    }

    async fn dispatch_untracked(
        &self,
        bodies: Vec<serde_json::Result<Vec<u8>>>,
        in_flight: &Arc<Semaphore>,
    ) -> usize {
        let mut dispatched = 0;
        for body in bodies {
            let body = match body {
                Ok(body) => body,
                Err(e) => {
                    error!("Worker {}: failed to serialize event: {e}", self.worker_id);
                    continue;
                }
            };

            let Ok(permit) = Arc::clone(in_flight).acquire_owned().await else {
                break;
            };
            let dispatcher = Arc::clone(&self.dispatcher);
            tokio::spawn(async move {
                if let DispatchOutcome::Failed { last_error, .. } = dispatcher.send_once(&body).await
                {
                    trace!("Untracked send failed: {last_error}");
                }
                drop(permit);
            });
            dispatched += 1;
        }
        dispatched
    }

    /// Wait for every untracked send to finish.
    async fn drain(&self, in_flight: &Semaphore) {
        let permits = u32::try_from(self.config.in_flight_limit()).unwrap_or(u32::MAX);
        debug!("Worker {} draining in-flight requests", self.worker_id);
        if let Ok(all) = in_flight.acquire_many(permits).await {
            drop(all);
        }
    }

    fn log_progress(&self, sent: u64, tally: BatchTally, start: Instant) {
        let elapsed = start.elapsed().as_secs_f64();
        let attempts = if self.config.track_outcomes {
            tally.total()
        } else {
            sent
        };
        let rps = rate(attempts, elapsed);

        match self.config.termination {
            TerminationMode::Count { .. } => info!(
                "Worker {} progress: {}/{} sent, ok {}, fail {}, RPS {:.0}",
                self.worker_id,
                sent,
                self.quota(),
                tally.success,
                tally.failure,
                rps
            ),
            TerminationMode::Duration(d) => info!(
                "Worker {} progress (time): {} sent, ok {}, fail {}, RPS {:.0}, remaining {:.1}s",
                self.worker_id,
                sent,
                tally.success,
                tally.failure,
                rps,
                (d.as_secs_f64() - elapsed).max(0.0)
            ),
        }

        if let Some(r) = success_rate(self.config.track_outcomes, tally.success, tally.failure) {
            trace!("Worker {} running success rate {:.4}", self.worker_id, r);
        }
    }
}
