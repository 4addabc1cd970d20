//! Concurrent dispatch of one batch of events.

use crate::dispatcher::Dispatcher;
use crate::transport::Transport;
use event_generator::EventRecord;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Success/failure counts for a set of dispatched events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTally {
    pub success: u64,
    pub failure: u64,
}

impl BatchTally {
    pub fn total(&self) -> u64 {
        self.success + self.failure
    }
}

impl Add for BatchTally {
    type Output = BatchTally;

    fn add(self, rhs: BatchTally) -> BatchTally {
        BatchTally {
            success: self.success + rhs.success,
            failure: self.failure + rhs.failure,
        }
    }
}

impl AddAssign for BatchTally {
    fn add_assign(&mut self, rhs: BatchTally) {
        self.success += rhs.success;
        self.failure += rhs.failure;
    }
}

/// Dispatches a batch concurrently and tallies the outcomes.
pub struct BatchRunner<'a, T: Transport> {
    dispatcher: &'a Dispatcher<T>,
}

impl<'a, T: Transport> BatchRunner<'a, T> {
    pub fn new(dispatcher: &'a Dispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Send every event concurrently and wait for all of them.
    ///
    /// `success + failure` always equals `events.len()`; one failed event
    /// never stops the others.
    pub async fn run_batch(&self, events: &[EventRecord]) -> BatchTally {
        let outcomes = join_all(events.iter().map(|e| self.dispatcher.send(e))).await;

        let mut tally = BatchTally::default();
        for outcome in &outcomes {
            if outcome.is_success() {
                tally.success += 1;
            } else {
                tally.failure += 1;
            }
        }

        tracing::trace!(
            "Batch of {} finished: {} ok, {} failed",
            events.len(),
            tally.success,
            tally.failure
        );
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::tests::{MockTransport, Reply};
    use crate::dispatcher::DispatchSettings;
    use crate::policy::RetryPolicy;
    use event_generator::{EventSchema, SchemaKind, SchemaOptions, SeededRandom};

    fn events(n: usize) -> Vec<EventRecord> {
        let mut rng = SeededRandom::new(3);
        let schema = SchemaKind::AutoClick
            .build(&mut rng, &SchemaOptions::default())
            .unwrap();
        (0..n).map(|_| schema.synthesize(&mut rng)).collect()
    }

    fn no_retry() -> DispatchSettings {
        DispatchSettings {
            retry: RetryPolicy::none(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_all_success() {
        let dispatcher = Dispatcher::new(MockTransport::always(Reply::Status(200)), no_retry());
        let tally = BatchRunner::new(&dispatcher).run_batch(&events(150)).await;

        assert_eq!(tally, BatchTally { success: 150, failure: 0 });
    }

    #[tokio::test]
    async fn test_partial_failure_accounting() {
        // Without retries each event consumes exactly one scripted reply.
        let script = (0..20)
            .map(|i| if i % 4 == 0 { Reply::Refused } else { Reply::Status(200) })
            .collect();
        let dispatcher =
            Dispatcher::new(MockTransport::scripted(script, Reply::Status(200)), no_retry());

        let tally = BatchRunner::new(&dispatcher).run_batch(&events(20)).await;
        assert_eq!(tally.total(), 20);
        assert_eq!(tally.failure, 5);
        assert_eq!(tally.success, 15);
    }

    #[tokio::test]
    async fn test_all_failure_still_counts_every_event() {
        let dispatcher = Dispatcher::new(MockTransport::always(Reply::Status(500)), no_retry());
        let tally = BatchRunner::new(&dispatcher).run_batch(&events(7)).await;

        assert_eq!(tally, BatchTally { success: 0, failure: 7 });
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dispatcher = Dispatcher::new(MockTransport::always(Reply::Status(200)), no_retry());
        let tally = BatchRunner::new(&dispatcher).run_batch(&[]).await;

        assert_eq!(tally.total(), 0);
        assert_eq!(dispatcher.transport().calls(), 0);
    }

    #[test]
    fn test_tally_addition() {
        let mut a = BatchTally { success: 10, failure: 2 };
        a += BatchTally { success: 8, failure: 0 };
        assert_eq!(a, BatchTally { success: 18, failure: 2 });
        assert_eq!(a + BatchTally::default(), a);
    }
}
