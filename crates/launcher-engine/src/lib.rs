//! Parallel traffic launching for traffic-launcher.
//!
//! The [`Coordinator`] spawns one OS thread per worker. Each [`WorkerLoop`]
//! synthesizes events from its own seeded random source and posts them in
//! concurrent batches until its quota or duration is reached, then sends one
//! [`WorkerMessage`] back. The coordinator folds those into an
//! [`AggregatedReport`].
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Coordinator        │
//!                 │ (spawn, collect, report) │
//!                 └────────────┬─────────────┘
//!            ┌─────────────────┼─────────────────┐
//!            ▼                 ▼                 ▼
//!     ┌────────────┐    ┌────────────┐    ┌────────────┐
//!     │  Worker 1  │    │  Worker 2  │    │  Worker N  │
//!     │ rng + pool │    │ rng + pool │    │ rng + pool │
//!     └─────┬──────┘    └─────┬──────┘    └─────┬──────┘
//!           │ POST            │ POST            │ POST
//!           ▼                 ▼                 ▼
//!     ┌─────────────────────────────────────────────────┐
//!     │              Collection endpoint                │
//!     └─────────────────────────────────────────────────┘
//!           │                 │                 │
//!           └──── WorkerMessage::Done (mpsc) ───┘
//! ```

pub mod aggregator;
pub mod config;
pub mod coordinator;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod worker;

pub use aggregator::{
    aggregate_reports, format_duration, format_markdown, format_number, format_rate,
    format_table, render, AggregationContext, OutputFormat,
};
pub use config::{
    default_seed, parse_duration, LaunchConfig, TerminationMode, DEFAULT_BATCH_SIZE,
    DEFAULT_CONCURRENCY, DEFAULT_TOTAL_REQUESTS,
};
pub use coordinator::{collect_reports, CollectedReports, Coordinator};
pub use environment::{default_worker_count, log_runtime_environment};
pub use error::{ConfigError, IncompleteRun};
pub use metrics::{AggregatedReport, EnvironmentInfo, MissingWorker, WorkerMessage, WorkerReport};
pub use worker::WorkerLoop;
