//! Launch configuration.

use crate::environment::default_worker_count;
use crate::error::ConfigError;
use event_dispatch::{DispatchSettings, HttpPoolConfig};
use event_generator::{SchemaKind, SchemaOptions};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Requests sent when the total is given as 0.
pub const DEFAULT_TOTAL_REQUESTS: u64 = 100_000;

/// Events per batch.
pub const DEFAULT_BATCH_SIZE: usize = 150;

/// Batches run together per iteration.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Upper bound for `batch_size * concurrency`.
pub const MAX_IN_FLIGHT: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// When a worker stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationMode {
    /// Send exactly `total / worker_count` events per worker.
    Count { total: u64 },
    /// Keep sending until the duration has elapsed, checked between iterations.
    Duration(Duration),
}

impl TerminationMode {
    /// Build from the positional CLI values: a duration above zero wins,
    /// and a total of zero means [`DEFAULT_TOTAL_REQUESTS`].
    pub fn from_positional(total: u64, duration: Option<Duration>) -> Self {
        match duration {
            Some(d) if !d.is_zero() => TerminationMode::Duration(d),
            _ if total == 0 => TerminationMode::Count {
                total: DEFAULT_TOTAL_REQUESTS,
            },
            _ => TerminationMode::Count { total },
        }
    }
}

impl std::fmt::Display for TerminationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationMode::Count { total } => write!(f, "count ({total} requests)"),
            TerminationMode::Duration(d) => write!(f, "duration ({}s)", d.as_secs_f64()),
        }
    }
}

/// Configuration shared by the coordinator and every worker.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Collection endpoint (http:// or https://).
    pub endpoint: String,
    pub termination: TerminationMode,
    pub worker_count: usize,
    pub batch_size: usize,
    pub concurrency: usize,
    /// Worker `n` seeds its random source with `base_seed + n`.
    pub base_seed: u32,
    pub schema: SchemaKind,
    pub schema_options: SchemaOptions,
    /// `false` runs fire-and-forget: no waiting, no retries, no ok/fail counts.
    pub track_outcomes: bool,
    pub dispatch: DispatchSettings,
    pub pool: HttpPoolConfig,
    /// Stop waiting for worker reports after this long.
    pub report_timeout: Option<Duration>,
}

impl LaunchConfig {
    /// Create a configuration with defaults for everything but the endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            termination: TerminationMode::Count {
                total: DEFAULT_TOTAL_REQUESTS,
            },
            worker_count: default_worker_count(),
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            base_seed: default_seed(),
            schema: SchemaKind::default(),
            schema_options: SchemaOptions::default(),
            track_outcomes: true,
            dispatch: DispatchSettings::default(),
            pool: HttpPoolConfig::default(),
            report_timeout: None,
        }
    }

    pub fn with_termination(mut self, termination: TerminationMode) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn with_schema(mut self, schema: SchemaKind, options: SchemaOptions) -> Self {
        self.schema = schema;
        self.schema_options = options;
        self
    }

    pub fn with_track_outcomes(mut self, track: bool) -> Self {
        self.track_outcomes = track;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchSettings) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_pool(mut self, pool: HttpPoolConfig) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_report_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.report_timeout = timeout;
        self
    }

    /// Events each worker sends in count mode. The remainder of the floor
    /// division is not sent.
    pub fn per_worker_quota(&self) -> Option<u64> {
        match self.termination {
            TerminationMode::Count { total } => {
                Some(total / self.worker_count.max(1) as u64)
            }
            TerminationMode::Duration(_) => None,
        }
    }

    /// Events dropped by the per-worker floor division.
    pub fn unsent_remainder(&self) -> u64 {
        match self.termination {
            TerminationMode::Count { total } => total % self.worker_count.max(1) as u64,
            TerminationMode::Duration(_) => 0,
        }
    }

    /// Upper bound on requests a worker has in flight.
    pub fn in_flight_limit(&self) -> usize {
        self.batch_size.saturating_mul(self.concurrency)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.endpoint)?;

        if self.worker_count == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        let in_flight = self.in_flight_limit();
        if in_flight > MAX_IN_FLIGHT || in_flight > u32::MAX as usize {
            return Err(ConfigError::InFlightTooLarge(in_flight));
        }
        if let Some(p) = self.schema_options.client_reuse_probability {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidReuseProbability(p));
            }
        }
        if let TerminationMode::Duration(d) = self.termination {
            if d.is_zero() {
                return Err(ConfigError::ZeroDuration);
            }
        }
        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let rest = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"));
    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidEndpoint(endpoint.to_string())),
    }
}

/// Seed taken from the wall clock when none is given.
pub fn default_seed() -> u32 {
    chrono::Utc::now().timestamp_millis() as u32
}

/// Parse a duration string like "300", "90s", "30m" or "1h".
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidDuration(s.to_string()));
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 3600)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1)
    } else {
        // Assume seconds if no suffix
        (s, 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidDuration(s.to_string()))?;

    num.checked_mul(multiplier)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidDuration(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LaunchConfig::new("http://localhost:8080/collect")
            .with_workers(12)
            .with_batch_size(100)
            .with_concurrency(2)
            .with_seed(7)
            .with_track_outcomes(false)
            .with_report_timeout(Some(Duration::from_secs(60)));

        assert_eq!(config.worker_count, 12);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.base_seed, 7);
        assert!(!config.track_outcomes);
        assert_eq!(config.in_flight_limit(), 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = LaunchConfig::new("https://collector.example.com/api/collect");
        assert_eq!(config.batch_size, 150);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.worker_count, num_cpus::get());
        assert!(config.track_outcomes);
        assert_eq!(
            config.termination,
            TerminationMode::Count { total: 100_000 }
        );
    }

    #[test]
    fn test_per_worker_quota_floors() {
        let config = LaunchConfig::new("http://localhost/collect")
            .with_workers(12)
            .with_termination(TerminationMode::Count { total: 100_000 });

        assert_eq!(config.per_worker_quota(), Some(8333));
        assert_eq!(config.unsent_remainder(), 4);

        let timed = config.with_termination(TerminationMode::Duration(Duration::from_secs(5)));
        assert_eq!(timed.per_worker_quota(), None);
        assert_eq!(timed.unsent_remainder(), 0);
    }

    #[test]
    fn test_termination_from_positional() {
        assert_eq!(
            TerminationMode::from_positional(0, None),
            TerminationMode::Count { total: 100_000 }
        );
        assert_eq!(
            TerminationMode::from_positional(500, Some(Duration::ZERO)),
            TerminationMode::Count { total: 500 }
        );
        assert_eq!(
            TerminationMode::from_positional(500, Some(Duration::from_secs(300))),
            TerminationMode::Duration(Duration::from_secs(300))
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = LaunchConfig::new("http://localhost/collect");

        assert_eq!(
            base.clone().with_workers(0).validate(),
            Err(ConfigError::NoWorkers)
        );
        assert_eq!(
            base.clone().with_batch_size(0).validate(),
            Err(ConfigError::InvalidBatchSize)
        );
        assert_eq!(
            base.clone().with_concurrency(0).validate(),
            Err(ConfigError::InvalidConcurrency)
        );
        assert_eq!(
            base.clone()
                .with_termination(TerminationMode::Duration(Duration::ZERO))
                .validate(),
            Err(ConfigError::ZeroDuration)
        );
        assert_eq!(
            base.clone()
                .with_schema(
                    SchemaKind::ShoppingMall,
                    SchemaOptions {
                        client_reuse_probability: Some(1.5),
                        ..Default::default()
                    }
                )
                .validate(),
            Err(ConfigError::InvalidReuseProbability(1.5))
        );
    }

    #[test]
    fn test_validate_endpoint() {
        assert!(validate_endpoint("http://localhost:3000/api").is_ok());
        assert!(validate_endpoint("https://example.com").is_ok());
        assert!(validate_endpoint("ftp://example.com").is_err());
        assert!(validate_endpoint("http://").is_err());
        assert!(validate_endpoint("localhost:3000").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("300").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert!(parse_duration("").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("5d").is_err());
    }
}
