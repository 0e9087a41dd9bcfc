//! Fan-in of concurrent replica replies
//!
//! Every dispatch task records exactly one result. The coordinator waits until
//! enough results have arrived for its decision and then reads a snapshot;
//! stragglers keep landing in the collector afterwards and are ignored.

use std::sync::Mutex;
use tokio::sync::watch;

use crate::client::replica_client::ReplicaFailure;

#[derive(Debug)]
struct Results<T> {
    successes: Vec<T>,
    failures: Vec<ReplicaFailure>,
}

/// What had arrived when the waiter was released, in arrival order
#[derive(Debug, Clone)]
pub struct CollectedResponses<T> {
    pub successes: Vec<T>,
    pub failures: Vec<ReplicaFailure>,
}

/// Created fresh for every operation attempt and never reused
#[derive(Debug)]
pub struct ResponseCollector<T> {
    results: Mutex<Results<T>>,
    // Bumped only after the result is in `results`
    recorded: watch::Sender<usize>,
}

impl<T: Clone> Default for ResponseCollector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ResponseCollector<T> {
    pub fn new() -> Self {
        let (recorded, _) = watch::channel(0);
        Self {
            results: Mutex::new(Results {
                successes: Vec::new(),
                failures: Vec::new(),
            }),
            recorded,
        }
    }

    pub fn record_success(&self, payload: T) {
        self.push(|r| r.successes.push(payload));
    }

    pub fn record_failure(&self, failure: ReplicaFailure) {
        self.push(|r| r.failures.push(failure));
    }

    fn push(&self, f: impl FnOnce(&mut Results<T>)) {
        {
            let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut results);
        }
        self.recorded.send_modify(|n| *n += 1);
    }

    /// Total results recorded so far
    pub fn recorded(&self) -> usize {
        *self.recorded.borrow()
    }

    /// Suspend until at least `threshold` results (of either kind) arrived
    pub async fn wait_until(&self, threshold: usize) -> CollectedResponses<T> {
        let mut rx = self.recorded.subscribe();
        // The sender lives in `self`, so this only returns once satisfied
        let _ = rx.wait_for(|n| *n >= threshold).await;
        self.snapshot()
    }

    pub fn snapshot(&self) -> CollectedResponses<T> {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        CollectedResponses {
            successes: results.successes.clone(),
            failures: results.failures.clone(),
        }
    }

    pub fn successes(&self) -> Vec<T> {
        self.snapshot().successes
    }

    pub fn failures(&self) -> Vec<ReplicaFailure> {
        self.snapshot().failures
    }
}
