//! Success and retry policies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_RETRY_LIMIT: u32 = 2;

/// Default pause between attempts.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(10);

/// Which status codes count as a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuccessPolicy {
    /// `200..300`
    #[default]
    Strict,
    /// Anything below 400, so redirects also count.
    NonError,
}

impl SuccessPolicy {
    pub fn is_success(&self, status: u16) -> bool {
        match self {
            SuccessPolicy::Strict => (200..300).contains(&status),
            SuccessPolicy::NonError => (200..400).contains(&status),
        }
    }
}

impl fmt::Display for SuccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessPolicy::Strict => write!(f, "strict"),
            SuccessPolicy::NonError => write!(f, "non-error"),
        }
    }
}

/// Bounded retry with a fixed backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `limit + 1`.
    pub limit: u32,
    pub backoff: Duration,
    /// Retry status failures as well as transport failures.
    pub retry_on_status: bool,
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            limit: 0,
            backoff: Duration::ZERO,
            retry_on_status: false,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.limit.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RETRY_LIMIT,
            backoff: DEFAULT_RETRY_BACKOFF,
            retry_on_status: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_policy() {
        let p = SuccessPolicy::Strict;
        assert!(p.is_success(200));
        assert!(p.is_success(204));
        assert!(!p.is_success(199));
        assert!(!p.is_success(301));
        assert!(!p.is_success(500));
    }

    #[test]
    fn test_non_error_policy() {
        let p = SuccessPolicy::NonError;
        assert!(p.is_success(200));
        assert!(p.is_success(302));
        assert!(!p.is_success(400));
        assert!(!p.is_success(100));
    }

    #[test]
    fn test_max_attempts() {
        assert_eq!(RetryPolicy::default().max_attempts(), 3);
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }
}
