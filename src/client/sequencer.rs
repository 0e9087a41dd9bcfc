//! Sequence numbers from the ordering authority
//!
//! Every `put` and `take` obtains exactly one fresh number before any replica
//! is contacted. A source that failed once is never asked again: the
//! coordinator swaps it for the handle returned by [`SequenceSource::reset`].

use serde::{Deserialize, Serialize};

use crate::common::Result;

/// Globally unique, monotonically increasing operation number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection to the ordering authority
#[async_trait::async_trait]
pub trait SequenceSource: Send + Sync {
    /// Fetch the next number; fails with `Error::OrderingUnavailable`
    async fn next(&self) -> Result<SequenceNumber>;

    /// A freshly connected handle to the same authority
    fn reset(&self) -> Box<dyn SequenceSource>;
}
