//! Ordered-delay scheduling of per-replica dispatch
//!
//! Replica `i` gets a default delay of `i * slot`, so replica 0 is contacted
//! first and every later replica progressively later. When two clients issue
//! conflicting `take`s at the same time, this stagger makes it predictable
//! which of them each replica serves first in the common case.
//!
//! The dispatch order is ascending delay, ties broken by index. It is computed
//! lazily by [`DispatchOrder`] and can be walked any number of times.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OrderedDelayScheduler {
    delays: Vec<Duration>,
}

impl OrderedDelayScheduler {
    /// Scheduler for `replicas` replicas, staggered by `slot`
    pub fn new(replicas: usize, slot: Duration) -> Self {
        let delays = (0..replicas)
            .map(|i| slot.saturating_mul(i as u32))
            .collect();
        Self { delays }
    }

    /// Number of replicas this scheduler was built for
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    pub fn delay(&self, index: usize) -> Option<Duration> {
        self.delays.get(index).copied()
    }

    /// Override one replica's delay for every later walk.
    ///
    /// Returns false if `index` is out of range.
    pub fn set_delay(&mut self, index: usize, delay: Duration) -> bool {
        match self.delays.get_mut(index) {
            Some(d) => {
                *d = delay;
                true
            }
            None => false,
        }
    }

    /// Walk replica indices in dispatch order
    pub fn iter(&self) -> DispatchOrder<'_> {
        DispatchOrder {
            delays: &self.delays,
            last: None,
            remaining: self.delays.len(),
        }
    }
}

impl<'a> IntoIterator for &'a OrderedDelayScheduler {
    type Item = usize;
    type IntoIter = DispatchOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy sequence of replica indices, ascending by `(delay, index)`
#[derive(Debug, Clone)]
pub struct DispatchOrder<'a> {
    delays: &'a [Duration],
    last: Option<(Duration, usize)>,
    remaining: usize,
}

impl Iterator for DispatchOrder<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }

        // Smallest key strictly after the previously yielded one
        let next = self
            .delays
            .iter()
            .enumerate()
            .map(|(i, &d)| (d, i))
            .filter(|key| self.last.map_or(true, |last| *key > last))
            .min()?;

        self.last = Some(next);
        self.remaining -= 1;
        Some(next.1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for DispatchOrder<'_> {}
