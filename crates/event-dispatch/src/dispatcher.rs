//! Single-event delivery with a bounded retry loop.

use crate::error::DispatchError;
use crate::policy::{RetryPolicy, SuccessPolicy};
use crate::transport::Transport;
use event_generator::EventRecord;
use serde::{Deserialize, Serialize};

/// Policies applied to every send of one dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispatchSettings {
    pub success: SuccessPolicy,
    pub retry: RetryPolicy,
}

/// Result of delivering one event, after retries.
#[derive(Debug)]
pub enum DispatchOutcome {
    Delivered {
        status: u16,
        attempts: u32,
    },
    Failed {
        attempts: u32,
        last_error: DispatchError,
    },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            DispatchOutcome::Delivered { attempts, .. } => *attempts,
            DispatchOutcome::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Sends events through a [`Transport`] and classifies the result.
pub struct Dispatcher<T: Transport> {
    transport: T,
    settings: DispatchSettings,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, settings: DispatchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Serialize and deliver one event, retrying per the retry policy.
    pub async fn send(&self, event: &EventRecord) -> DispatchOutcome {
        match event.to_json_bytes() {
            Ok(body) => self.send_body(&body).await,
            Err(e) => {
                tracing::error!("Failed to serialize {} event: {e}", event.event_name);
                DispatchOutcome::Failed {
                    attempts: 0,
                    last_error: DispatchError::Serialization(e),
                }
            }
        }
    }

    /// Deliver an already serialized body, retrying per the retry policy.
    ///
    /// Makes at most `retry.limit + 1` attempts.
    pub async fn send_body(&self, body: &[u8]) -> DispatchOutcome {
        let retry = self.settings.retry;
        let max_attempts = retry.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let error = match self.attempt(body).await {
                Ok(status) => {
                    return DispatchOutcome::Delivered {
                        status,
                        attempts: attempt,
                    }
                }
                Err(e) => e,
            };

            let retryable = error.is_transport()
                || (retry.retry_on_status && matches!(error, DispatchError::Status(_)));

            if !retryable || attempt >= max_attempts {
                if retryable {
                    tracing::warn!(
                        "Giving up on {} after {attempt} attempts: {error}",
                        self.transport.endpoint()
                    );
                } else {
                    tracing::debug!("Not retrying {}: {error}", self.transport.endpoint());
                }
                return DispatchOutcome::Failed {
                    attempts: attempt,
                    last_error: error,
                };
            }

            tracing::debug!("Attempt {attempt}/{max_attempts} failed: {error}, retrying");
            if !retry.backoff.is_zero() {
                tokio::time::sleep(retry.backoff).await;
            }
        }
    }

    /// One attempt, no retries. Used by untracked sends.
    pub async fn send_once(&self, body: &[u8]) -> DispatchOutcome {
        match self.attempt(body).await {
            Ok(status) => DispatchOutcome::Delivered {
                status,
                attempts: 1,
            },
            Err(last_error) => DispatchOutcome::Failed {
                attempts: 1,
                last_error,
            },
        }
    }

    async fn attempt(&self, body: &[u8]) -> Result<u16, DispatchError> {
        let status = self.transport.post(body).await?;
        if self.settings.success.is_success(status) {
            Ok(status)
        } else {
            Err(DispatchError::Status(status))
        }
    }
}
