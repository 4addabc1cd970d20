//! Command-line interface for traffic-launcher
//!
//! # Usage Examples
//!
//! ## Fixed request count
//! ```bash
//! # 100,000 requests (the default) against a local collector
//! traffic-launcher http://localhost:3000/api/analytics/collect
//!
//! # 50,000 requests over 8 workers with a fixed seed
//! traffic-launcher http://localhost:3000/api/analytics/collect 50000 \
//!   --workers 8 --seed 42
//! ```
//!
//! ## Fixed duration
//! ```bash
//! # Five minutes of traffic
//! traffic-launcher http://collector.example.com/api/analytics/collect 0 5m
//!
//! # One hour, fire-and-forget auto-click events
//! traffic-launcher http://collector.example.com/api/analytics/collect 0 1h \
//!   --schema auto-click --fire-and-forget
//! ```
//!
//! Logs go to stderr (`RUST_LOG` controls the level, `info` by default);
//! the final report goes to stdout.

use anyhow::Context;
use clap::{Args, Parser, ValueEnum};
use event_dispatch::{DispatchSettings, HttpPoolConfig, RetryPolicy, SuccessPolicy};
use event_generator::{SchemaKind, SchemaOptions, DEFAULT_CLIENT_POOL_SIZE};
use launcher_engine::{
    default_seed, parse_duration, render, Coordinator, IncompleteRun, LaunchConfig,
    OutputFormat, TerminationMode, DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/analytics/collect";

#[derive(Parser)]
#[command(name = "traffic-launcher")]
#[command(about = "Fire synthetic analytics events at an HTTP collection endpoint from parallel workers")]
#[command(long_about = None)]
struct Cli {
    /// Collection endpoint (http:// or https://)
    #[arg(default_value = DEFAULT_ENDPOINT, env = "TRAFFIC_ENDPOINT")]
    endpoint: String,

    /// Total requests across all workers (0 = 100000)
    #[arg(default_value_t = 0)]
    total_requests: u64,

    /// Run for this long instead of a fixed count: seconds, or 30s/5m/1h (0 = off)
    #[arg(default_value = "0", value_parser = parse_duration)]
    duration: Duration,

    #[command(flatten)]
    launch: LaunchArgs,

    #[command(flatten)]
    dispatch: DispatchArgs,

    #[command(flatten)]
    pool: PoolArgs,

    /// Output format for the final report
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
    output_format: OutputFormat,
}

/// Worker and event options.
#[derive(Args)]
struct LaunchArgs {
    /// Number of workers (default: available CPU cores)
    #[arg(long, short = 'w', env = "TRAFFIC_WORKERS")]
    workers: Option<usize>,

    /// Events per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Batches run together per iteration
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Base seed; worker n uses seed + n (default: current time)
    #[arg(long, env = "TRAFFIC_SEED")]
    seed: Option<u32>,

    /// Event schema (shopping-mall or auto-click)
    #[arg(long, default_value = "shopping-mall")]
    schema: SchemaKind,

    /// Client ids generated up front per worker
    #[arg(long, default_value_t = DEFAULT_CLIENT_POOL_SIZE)]
    client_pool_size: usize,

    /// Probability of reusing a pooled client id (default depends on schema)
    #[arg(long)]
    client_reuse: Option<f64>,

    /// Do not wait for responses: no retries and no ok/fail counts
    #[arg(long)]
    fire_and_forget: bool,

    /// Give up waiting for worker reports after this long (e.g. 2h)
    #[arg(long, value_parser = parse_duration)]
    report_timeout: Option<Duration>,
}

/// Retry and success classification.
#[derive(Args)]
struct DispatchArgs {
    /// Retries after the first attempt
    #[arg(long, default_value_t = 2)]
    retry_limit: u32,

    /// Pause between attempts in milliseconds
    #[arg(long, default_value_t = 10)]
    retry_backoff_ms: u64,

    /// Only retry transport errors, not unexpected status codes
    #[arg(long)]
    no_retry_on_status: bool,

    /// Which status codes count as success
    #[arg(long, value_enum, default_value_t = SuccessPolicyArg::Strict)]
    success_policy: SuccessPolicyArg,
}

/// Per-worker HTTP connection pool.
#[derive(Args)]
struct PoolArgs {
    /// Per-request timeout
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    request_timeout: Duration,

    /// How long idle connections are kept
    #[arg(long, default_value = "15s", value_parser = parse_duration)]
    pool_idle_timeout: Duration,

    /// Idle connections kept per host
    #[arg(long, default_value_t = 1000)]
    pool_max_idle: usize,

    /// TCP keepalive probe interval (off unless set)
    #[arg(long, value_parser = parse_duration)]
    tcp_keepalive: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SuccessPolicyArg {
    /// 2xx only
    Strict,
    /// Anything below 400
    NonError,
}

impl From<SuccessPolicyArg> for SuccessPolicy {
    fn from(arg: SuccessPolicyArg) -> Self {
        match arg {
            SuccessPolicyArg::Strict => SuccessPolicy::Strict,
            SuccessPolicyArg::NonError => SuccessPolicy::NonError,
        }
    }
}

impl Cli {
    fn into_config(self) -> LaunchConfig {
        let termination = TerminationMode::from_positional(self.total_requests, Some(self.duration));

        let mut config = LaunchConfig::new(self.endpoint)
            .with_termination(termination)
            .with_batch_size(self.launch.batch_size)
            .with_concurrency(self.launch.concurrency)
            .with_seed(self.launch.seed.unwrap_or_else(default_seed))
            .with_schema(
                self.launch.schema,
                SchemaOptions {
                    client_pool_size: self.launch.client_pool_size,
                    client_reuse_probability: self.launch.client_reuse,
                },
            )
            .with_track_outcomes(!self.launch.fire_and_forget)
            .with_dispatch(DispatchSettings {
                success: self.dispatch.success_policy.into(),
                retry: RetryPolicy {
                    limit: self.dispatch.retry_limit,
                    backoff: Duration::from_millis(self.dispatch.retry_backoff_ms),
                    retry_on_status: !self.dispatch.no_retry_on_status,
                },
            })
            .with_pool(HttpPoolConfig {
                max_idle_per_host: self.pool.pool_max_idle,
                idle_timeout: self.pool.pool_idle_timeout,
                request_timeout: self.pool.request_timeout,
                tcp_keepalive: self.pool.tcp_keepalive,
            })
            .with_report_timeout(self.launch.report_timeout);

        if let Some(workers) = self.launch.workers {
            config = config.with_workers(workers);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = cli.output_format;
    let config = cli.into_config();

    tracing::info!(
        "Launching {} against {} (seed {})",
        config.termination,
        config.endpoint,
        config.base_seed
    );

    let coordinator = Coordinator::new(config)?;
    match coordinator.run().await {
        Ok(report) => {
            println!("{}", render(&report, output_format)?);
            Ok(())
        }
        Err(e) => {
            if let Some(incomplete) = e.downcast_ref::<IncompleteRun>() {
                let partial = render(&incomplete.report, output_format)
                    .context("Failed to render partial report")?;
                println!("{partial}");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["traffic-launcher", "http://localhost:9000/collect"]).unwrap();
        let config = cli.into_config();

        assert_eq!(config.endpoint, "http://localhost:9000/collect");
        assert_eq!(config.termination, TerminationMode::Count { total: 100_000 });
        assert_eq!(config.batch_size, 150);
        assert_eq!(config.concurrency, 4);
        assert!(config.track_outcomes);
        assert_eq!(config.dispatch.retry, RetryPolicy::default());
        assert_eq!(config.dispatch.success, SuccessPolicy::Strict);
        assert_eq!(config.pool, HttpPoolConfig::default());
        assert_eq!(config.schema, SchemaKind::ShoppingMall);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_duration_mode() {
        let cli = Cli::try_parse_from([
            "traffic-launcher",
            "http://example.com/collect",
            "0",
            "5m",
            "--workers",
            "12",
            "--schema",
            "auto-click",
            "--fire-and-forget",
        ])
        .unwrap();
        let config = cli.into_config();

        assert_eq!(
            config.termination,
            TerminationMode::Duration(Duration::from_secs(300))
        );
        assert_eq!(config.worker_count, 12);
        assert_eq!(config.schema, SchemaKind::AutoClick);
        assert!(!config.track_outcomes);
    }

    #[test]
    fn test_cli_count_and_dispatch_flags() {
        let cli = Cli::try_parse_from([
            "traffic-launcher",
            "https://example.com/collect",
            "5000",
            "--seed",
            "7",
            "--retry-limit",
            "5",
            "--retry-backoff-ms",
            "50",
            "--no-retry-on-status",
            "--success-policy",
            "non-error",
            "--request-timeout",
            "5",
            "--report-timeout",
            "1h",
            "--pool-idle-timeout",
            "90s",
            "--tcp-keepalive",
            "20s",
            "-f",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.output_format, OutputFormat::Json);
        let config = cli.into_config();

        assert_eq!(config.termination, TerminationMode::Count { total: 5000 });
        assert_eq!(config.base_seed, 7);
        assert_eq!(config.dispatch.retry.limit, 5);
        assert_eq!(config.dispatch.retry.backoff, Duration::from_millis(50));
        assert!(!config.dispatch.retry.retry_on_status);
        assert_eq!(config.dispatch.success, SuccessPolicy::NonError);
        assert_eq!(config.pool.request_timeout, Duration::from_secs(5));
        assert_eq!(config.report_timeout, Some(Duration::from_secs(3600)));
        assert_eq!(config.pool.idle_timeout, Duration::from_secs(90));
        assert_eq!(config.pool.tcp_keepalive, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_cli_rejects_bad_duration() {
        assert!(Cli::try_parse_from(["traffic-launcher", "http://x/collect", "0", "5d"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
