//! Metrics types for worker output and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Runtime environment information captured at launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Number of CPU cores visible to the process
    pub cpu_cores: usize,
    /// Total memory in MB
    pub memory_mb: u64,
    /// Available memory in MB
    pub available_memory_mb: u64,
}

/// Final result of one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub worker_id: usize,
    /// Seed the worker's random source started from
    pub seed: u32,
    /// Events scheduled
    pub sent: u64,
    /// Events delivered (0 when untracked)
    pub ok: u64,
    /// Events that exhausted their attempts (0 when untracked)
    pub fail: u64,
    /// Whether ok/fail were counted
    pub tracked: bool,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl WorkerReport {
    /// Get duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }

    /// Attempted events: ok + fail when tracked, otherwise sent.
    pub fn attempts(&self) -> u64 {
        if self.tracked {
            self.ok + self.fail
        } else {
            self.sent
        }
    }

    pub fn requests_per_second(&self) -> f64 {
        rate(self.attempts(), self.duration_secs())
    }

    /// `ok / (ok + fail)`, `None` when untracked or nothing was attempted.
    pub fn success_rate(&self) -> Option<f64> {
        success_rate(self.tracked, self.ok, self.fail)
    }
}

/// Message from a worker thread to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkerMessage {
    /// Worker finished; sent exactly once.
    Done(WorkerReport),
    /// Worker could not start or run.
    Failed { worker_id: usize, error: String },
}

impl WorkerMessage {
    pub fn worker_id(&self) -> usize {
        match self {
            WorkerMessage::Done(report) => report.worker_id,
            WorkerMessage::Failed { worker_id, .. } => *worker_id,
        }
    }
}

/// Worker that did not deliver a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingWorker {
    pub worker_id: usize,
    /// Error reported by the worker, if it got that far
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated results from all workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub endpoint: String,
    /// Workers spawned
    pub expected_workers: usize,
    /// Workers whose final report arrived
    pub reported_workers: usize,
    pub missing_workers: Vec<MissingWorker>,
    pub total_sent: u64,
    pub total_ok: u64,
    pub total_fail: u64,
    /// `total_ok / (total_ok + total_fail)`
    pub success_rate: Option<f64>,
    /// Coordinator wall clock from spawn to last report
    pub wall_clock_duration_secs: f64,
    /// Attempts across all workers over the wall clock duration
    pub aggregate_requests_per_second: f64,
    pub tracked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentInfo>,
    /// Individual worker reports, ordered by worker id
    pub workers: Vec<WorkerReport>,
    pub aggregated_at: DateTime<Utc>,
}

impl AggregatedReport {
    pub fn is_complete(&self) -> bool {
        self.missing_workers.is_empty() && self.reported_workers == self.expected_workers
    }

    pub fn total_attempts(&self) -> u64 {
        if self.tracked {
            self.total_ok + self.total_fail
        } else {
            self.total_sent
        }
    }
}

pub(crate) fn rate(count: u64, secs: f64) -> f64 {
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

pub(crate) fn success_rate(tracked: bool, ok: u64, fail: u64) -> Option<f64> {
    let tried = ok + fail;
    if tracked && tried > 0 {
        Some(ok as f64 / tried as f64)
    } else {
        None
    }
}
