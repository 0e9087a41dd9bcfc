//! In-memory name server, sequencer and replicas for coordinator tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tuplespaces::client::{
    Discovery, OperationKind, ReplicaClient, ReplicaEntry, RpcError, SequenceNumber,
    SequenceSource,
};
use tuplespaces::{ClientConfig, Coordinator, Error, Result};

pub fn entries(qualifiers: &[&str]) -> Vec<ReplicaEntry> {
    qualifiers
        .iter()
        .enumerate()
        .map(|(i, q)| ReplicaEntry::new(format!("localhost:{}", 2001 + i), *q))
        .collect()
}

// === Name server ===

/// Answers lookups from a script; the last answer repeats
pub struct FakeDiscovery {
    script: Mutex<VecDeque<Result<Vec<ReplicaEntry>>>>,
    last: Mutex<Option<Vec<ReplicaEntry>>>,
    pub lookups: AtomicUsize,
}

impl FakeDiscovery {
    pub fn serving(qualifiers: &[&str]) -> Arc<Self> {
        Self::scripted(vec![Ok(entries(qualifiers))])
    }

    pub fn scripted(script: Vec<Result<Vec<ReplicaEntry>>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Discovery for FakeDiscovery {
    async fn lookup(&self, _service: &str, _qualifier: Option<&str>) -> Result<Vec<ReplicaEntry>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(servers)) => {
                *self.last.lock().unwrap() = Some(servers.clone());
                Ok(servers)
            }
            Some(Err(e)) => Err(e),
            None => match self.last.lock().unwrap().clone() {
                Some(servers) => Ok(servers),
                None => Err(Error::DiscoveryUnavailable("script exhausted".into())),
            },
        }
    }
}

// === Sequencer ===

#[derive(Default)]
pub struct SequencerState {
    pub counter: AtomicU64,
    pub calls: AtomicUsize,
    pub resets: AtomicUsize,
    pub failing: AtomicBool,
}

/// Every handle produced by `reset` shares the same state
#[derive(Clone)]
pub struct FakeSequencer {
    pub state: Arc<SequencerState>,
}

impl FakeSequencer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SequencerState::default()),
        }
    }
}

#[async_trait::async_trait]
impl SequenceSource for FakeSequencer {
    async fn next(&self) -> Result<SequenceNumber> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        if self.state.failing.load(Ordering::SeqCst) {
            return Err(Error::OrderingUnavailable("sequencer down".into()));
        }
        Ok(SequenceNumber(
            self.state.counter.fetch_add(1, Ordering::SeqCst) + 1,
        ))
    }

    fn reset(&self) -> Box<dyn SequenceSource> {
        self.state.resets.fetch_add(1, Ordering::SeqCst);
        Box::new(self.clone())
    }
}

// === Replicas ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub operation: OperationKind,
    pub qualifier: String,
    pub seq: Option<SequenceNumber>,
}

#[derive(Default)]
struct ReplicaState {
    tuples: Vec<String>,
    latency: Duration,
    failing: bool,
}

/// One tuple store per qualifier, with per-replica latency and failure
#[derive(Default)]
pub struct FakeReplicas {
    replicas: Mutex<HashMap<String, ReplicaState>>,
    pub arrivals: Mutex<Vec<Arrival>>,
    pub completed: AtomicUsize,
}

impl FakeReplicas {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, qualifier: &str, tuples: &[&str]) {
        let mut replicas = self.replicas.lock().unwrap();
        let state = replicas.entry(qualifier.to_string()).or_default();
        state.tuples.extend(tuples.iter().map(|t| t.to_string()));
    }

    pub fn set_latency(&self, qualifier: &str, latency: Duration) {
        let mut replicas = self.replicas.lock().unwrap();
        replicas.entry(qualifier.to_string()).or_default().latency = latency;
    }

    pub fn set_failing(&self, qualifier: &str, failing: bool) {
        let mut replicas = self.replicas.lock().unwrap();
        replicas.entry(qualifier.to_string()).or_default().failing = failing;
    }

    pub fn tuples(&self, qualifier: &str) -> Vec<String> {
        let replicas = self.replicas.lock().unwrap();
        replicas
            .get(qualifier)
            .map(|s| s.tuples.clone())
            .unwrap_or_default()
    }

    pub fn arrivals(&self) -> Vec<Arrival> {
        self.arrivals.lock().unwrap().clone()
    }

    pub fn arrival_order(&self, operation: OperationKind) -> Vec<String> {
        self.arrivals()
            .into_iter()
            .filter(|a| a.operation == operation)
            .map(|a| a.qualifier)
            .collect()
    }

    pub fn seqs(&self) -> HashSet<SequenceNumber> {
        self.arrivals().into_iter().filter_map(|a| a.seq).collect()
    }

    /// Record the arrival, wait out the latency, then apply `f`
    async fn call<T>(
        &self,
        operation: OperationKind,
        replica: &ReplicaEntry,
        seq: Option<SequenceNumber>,
        f: impl FnOnce(&mut Vec<String>) -> std::result::Result<T, RpcError>,
    ) -> std::result::Result<T, RpcError> {
        self.arrivals.lock().unwrap().push(Arrival {
            operation,
            qualifier: replica.qualifier.clone(),
            seq,
        });

        let latency = {
            let replicas = self.replicas.lock().unwrap();
            replicas
                .get(&replica.qualifier)
                .map(|s| s.latency)
                .unwrap_or_default()
        };
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let result = {
            let mut replicas = self.replicas.lock().unwrap();
            let state = replicas.entry(replica.qualifier.clone()).or_default();
            if state.failing {
                Err(RpcError::Status {
                    code: 503,
                    message: format!("replica {} unavailable", replica.qualifier),
                })
            } else {
                f(&mut state.tuples)
            }
        };
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}

/// `<a,*>` matches `<a,1>`; fields compared one by one
pub fn matches(pattern: &str, tuple: &str) -> bool {
    let fields = |s: &str| -> Vec<String> {
        s.trim_start_matches('<')
            .trim_end_matches('>')
            .split(',')
            .map(|f| f.trim().to_string())
            .collect()
    };
    let (p, t) = (fields(pattern), fields(tuple));
    p.len() == t.len() && p.iter().zip(&t).all(|(p, t)| p == "*" || p == t)
}

#[async_trait::async_trait]
impl ReplicaClient for FakeReplicas {
    async fn put(
        &self,
        replica: &ReplicaEntry,
        tuple: &str,
        seq: SequenceNumber,
    ) -> std::result::Result<(), RpcError> {
        let tuple = tuple.to_string();
        self.call(OperationKind::Put, replica, Some(seq), move |tuples| {
            tuples.push(tuple);
            Ok(())
        })
        .await
    }

    async fn read(
        &self,
        replica: &ReplicaEntry,
        pattern: &str,
    ) -> std::result::Result<String, RpcError> {
        self.call(OperationKind::Read, replica, None, |tuples| {
            tuples
                .iter()
                .find(|t| matches(pattern, t.as_str()))
                .cloned()
                .ok_or_else(|| RpcError::Status {
                    code: 404,
                    message: "no match".into(),
                })
        })
        .await
    }

    async fn take(
        &self,
        replica: &ReplicaEntry,
        pattern: &str,
        seq: SequenceNumber,
    ) -> std::result::Result<String, RpcError> {
        self.call(OperationKind::Take, replica, Some(seq), |tuples| {
            match tuples.iter().position(|t| matches(pattern, t)) {
                Some(i) => Ok(tuples.remove(i)),
                None => Err(RpcError::Status {
                    code: 404,
                    message: "no match".into(),
                }),
            }
        })
        .await
    }

    async fn get_state(&self, replica: &ReplicaEntry) -> std::result::Result<Vec<String>, RpcError> {
        self.call(OperationKind::GetTupleSpacesState, replica, None, |tuples| {
            Ok(tuples.clone())
        })
        .await
    }
}

pub fn config(stagger: Duration) -> ClientConfig {
    ClientConfig {
        stagger_ms: stagger.as_millis() as u64,
        ..Default::default()
    }
}

pub fn coordinator(
    stagger: Duration,
    discovery: &Arc<FakeDiscovery>,
    sequencer: &FakeSequencer,
    replicas: &Arc<FakeReplicas>,
) -> Coordinator {
    Coordinator::new(
        &config(stagger),
        discovery.clone(),
        Box::new(sequencer.clone()),
        replicas.clone(),
    )
}
