//! Delivery of synthetic events to an HTTP collection endpoint.
//!
//! A [`Dispatcher`] posts one event per request through a [`Transport`],
//! retrying transport failures (and, by default, non-success statuses) a
//! bounded number of times. A [`BatchRunner`] fans a batch out concurrently
//! and reduces the outcomes to a [`BatchTally`].

pub mod batch;
pub mod dispatcher;
pub mod error;
pub mod policy;
pub mod transport;

pub use batch::{BatchRunner, BatchTally};
pub use dispatcher::{DispatchOutcome, DispatchSettings, Dispatcher};
pub use error::DispatchError;
pub use policy::{RetryPolicy, SuccessPolicy, DEFAULT_RETRY_BACKOFF, DEFAULT_RETRY_LIMIT};
pub use transport::{HttpPoolConfig, HttpTransport, Transport};
