//! Error types for the launcher engine.

use crate::metrics::AggregatedReport;
use thiserror::Error;

/// Invalid launch configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Endpoint is not an http:// or https:// URL.
    #[error("Invalid endpoint '{0}': expected an http:// or https:// URL")]
    InvalidEndpoint(String),

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Batch size must be at least 1")]
    InvalidBatchSize,

    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,

    /// In-flight bound does not fit a semaphore.
    #[error("batch_size x concurrency ({0}) exceeds the in-flight request limit")]
    InFlightTooLarge(usize),

    #[error("Client reuse probability must be within [0, 1], got {0}")]
    InvalidReuseProbability(f64),

    #[error("Invalid duration '{0}': expected seconds or a value with s/m/h suffix")]
    InvalidDuration(String),

    #[error("Duration must be greater than zero")]
    ZeroDuration,
}

/// Not every worker delivered its final report.
///
/// Carries the partial aggregate so callers can still print it.
#[derive(Error, Debug)]
#[error("Only {received}/{expected} workers reported (missing: {missing:?})")]
pub struct IncompleteRun {
    pub expected: usize,
    pub received: usize,
    pub missing: Vec<usize>,
    pub report: Box<AggregatedReport>,
}
