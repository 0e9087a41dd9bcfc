//! Client-side coordination of one logical operation across all replicas
//!
//! Per attempt: discover replicas if none are known, take a sequence number
//! for `put`/`take`, fan the call out to every replica through the ordered
//! delay scheduler, collect replies and decide. Any replica failure clears
//! the whole replica set (replicas are not expected to fail independently)
//! and, while the caller's retry budget lasts, the operation starts over with
//! a fresh discovery.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::client::collector::ResponseCollector;
use crate::client::delayer::OrderedDelayScheduler;
use crate::client::operation::{OperationKind, Outcome};
use crate::client::replica_client::{PendingCall, ReplicaClient, ReplicaFailure, RpcError};
use crate::client::replicas::{Discovery, ReplicaEntry, ReplicaSet};
use crate::client::sequencer::{SequenceNumber, SequenceSource};
use crate::common::{random_client_id, validate_tuple, ClientConfig, Error, Result};
use crate::transport::{HttpReplicaClient, NameServerClient, SequencerClient};

pub struct Coordinator {
    client_id: u32,
    service_name: String,
    qualifier: Option<String>,
    discovery: Arc<dyn Discovery>,
    sequencer: Box<dyn SequenceSource>,
    replica_client: Arc<dyn ReplicaClient>,
    replicas: ReplicaSet,
    stagger: Duration,
    scheduler: OrderedDelayScheduler,
    /// Delay overrides by qualifier, re-applied after every discovery
    delay_schedule: HashMap<String, Duration>,
}

impl Coordinator {
    pub fn new(
        config: &ClientConfig,
        discovery: Arc<dyn Discovery>,
        sequencer: Box<dyn SequenceSource>,
        replica_client: Arc<dyn ReplicaClient>,
    ) -> Self {
        let client_id = random_client_id();
        tracing::debug!("Client ID: {}", client_id);

        let stagger = config.stagger();
        Self {
            client_id,
            service_name: config.service_name.clone(),
            qualifier: config.qualifier.clone(),
            discovery,
            sequencer,
            replica_client,
            replicas: ReplicaSet::default(),
            stagger,
            scheduler: OrderedDelayScheduler::new(0, stagger),
            delay_schedule: HashMap::new(),
        }
    }

    /// Coordinator talking HTTP to the endpoints in `config`
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Name server: {}", config.name_server);
        tracing::info!("Sequencer: {}", config.sequencer);

        Ok(Self::new(
            config,
            Arc::new(NameServerClient::new(&config.name_server)),
            Box::new(SequencerClient::new(&config.sequencer)),
            Arc::new(HttpReplicaClient::new()),
        ))
    }

    pub fn client_id(&self) -> u32 {
        self.client_id
    }

    pub fn replicas(&self) -> &ReplicaSet {
        &self.replicas
    }

    pub fn scheduler(&self) -> &OrderedDelayScheduler {
        &self.scheduler
    }

    /// Override the dispatch delay of the replica with `qualifier`.
    ///
    /// Applies to every later operation, including after rediscovery.
    pub fn set_delay(&mut self, qualifier: &str, delay: Duration) -> Result<()> {
        if !self.replicas.is_empty() {
            let index = self.replicas.position(qualifier).ok_or_else(|| {
                Error::InvalidArgument(format!("No servers found for qualifier {}", qualifier))
            })?;
            self.scheduler.set_delay(index, delay);
        }
        tracing::info!("Delay for replica {} set to {:?}", qualifier, delay);
        self.delay_schedule.insert(qualifier.to_string(), delay);
        Ok(())
    }

    /// Run `operation` with `argument`, rediscovering and retrying up to
    /// `retries` times after a replica failure.
    pub async fn execute(
        &mut self,
        operation: OperationKind,
        argument: &str,
        retries: u32,
    ) -> Result<Outcome> {
        tracing::debug!(
            "execute: client={}, command={}, args={}, retries={}",
            self.client_id,
            operation,
            argument,
            retries
        );

        match operation {
            OperationKind::GetTupleSpacesState => {
                if argument.trim().is_empty() {
                    return Err(Error::InvalidArgument("missing replica qualifier".into()));
                }
            }
            _ => validate_tuple(argument)?,
        }

        let mut remaining = retries;
        let mut attempt = 1;
        loop {
            match self.attempt(operation, argument, attempt).await {
                Err(e) if e.is_retryable() => {
                    tracing::error!("Failed {} RPC: {}", operation, e);
                    self.invalidate_replicas();
                    if remaining == 0 {
                        return Err(e);
                    }
                    tracing::warn!("Assuming all servers are down, retrying with new servers");
                    remaining -= 1;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn attempt(
        &mut self,
        operation: OperationKind,
        argument: &str,
        attempt: u32,
    ) -> Result<Outcome> {
        self.ensure_replicas().await?;

        if operation.is_ordered() {
            let seq = self.next_sequence().await?;
            return self.ordered(operation, argument, seq, attempt).await;
        }
        match operation {
            OperationKind::GetTupleSpacesState => self.get_state(argument, attempt).await,
            _ => self.read(argument, attempt).await,
        }
    }

    async fn ensure_replicas(&mut self) -> Result<()> {
        if !self.replicas.is_empty() {
            return Ok(());
        }

        let entries = self
            .discovery
            .lookup(&self.service_name, self.qualifier.as_deref())
            .await?;
        if entries.is_empty() {
            return Err(Error::NoReplicasFound {
                service: self.service_name.clone(),
                qualifier: self.qualifier.clone().unwrap_or_default(),
            });
        }
        self.install_replicas(entries);
        Ok(())
    }

    /// New discovery epoch: new membership, scheduler rebuilt for its size
    fn install_replicas(&mut self, entries: Vec<ReplicaEntry>) {
        tracing::info!(
            "Discovered {} replica(s): {}",
            entries.len(),
            entries
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.replicas.replace(entries);
        self.scheduler = OrderedDelayScheduler::new(self.replicas.len(), self.stagger);
        for (qualifier, delay) in &self.delay_schedule {
            if let Some(index) = self.replicas.position(qualifier) {
                self.scheduler.set_delay(index, *delay);
            }
        }
    }

    fn invalidate_replicas(&mut self) {
        tracing::warn!("Invalidating all {} known replica(s)", self.replicas.len());
        self.replicas.clear();
        self.scheduler = OrderedDelayScheduler::new(0, self.stagger);
    }

    async fn next_sequence(&mut self) -> Result<SequenceNumber> {
        match self.sequencer.next().await {
            Ok(seq) => {
                tracing::debug!("Got sequence number {}", seq);
                Ok(seq)
            }
            Err(e) => {
                tracing::error!("Failed to get sequence number: {}", e);
                self.sequencer = self.sequencer.reset();
                Err(match e {
                    Error::OrderingUnavailable(_) => e,
                    other => Error::OrderingUnavailable(other.to_string()),
                })
            }
        }
    }

    /// `put` or `take` under `seq`: every replica has to acknowledge
    async fn ordered(
        &mut self,
        operation: OperationKind,
        argument: &str,
        seq: SequenceNumber,
        attempt: u32,
    ) -> Result<Outcome> {
        let collector = self.dispatch(operation, |client, replica| {
            let argument = argument.to_string();
            async move {
                if operation == OperationKind::Take {
                    client.take(&replica, &argument, seq).await.map(Some)
                } else {
                    client.put(&replica, &argument, seq).await.map(|()| None)
                }
            }
        });

        let responses = collector.wait_until(self.replicas.len()).await;
        if let Some(failure) = responses.failures.first() {
            return Err(replica_failure(operation, argument, attempt, failure));
        }
        if operation == OperationKind::Put {
            return Ok(Outcome::Done);
        }
        match responses.successes.into_iter().flatten().next() {
            Some(tuple) => Ok(Outcome::Tuple(tuple)),
            None => Err(no_response(operation, argument, attempt)),
        }
    }

    async fn read(&mut self, pattern: &str, attempt: u32) -> Result<Outcome> {
        let collector = self.dispatch(OperationKind::Read, |client, replica| {
            let pattern = pattern.to_string();
            async move { client.read(&replica, &pattern).await }
        });

        // First success wins; failures only matter once nobody succeeded
        let mut last = None;
        for threshold in 1..=self.replicas.len() {
            let responses = collector.wait_until(threshold).await;
            if let Some(tuple) = responses.successes.into_iter().next() {
                return Ok(Outcome::Tuple(tuple));
            }
            last = responses.failures.into_iter().next();
        }

        match last {
            Some(failure) => Err(replica_failure(OperationKind::Read, pattern, attempt, &failure)),
            None => Err(no_response(OperationKind::Read, pattern, attempt)),
        }
    }

    async fn get_state(&mut self, qualifier: &str, attempt: u32) -> Result<Outcome> {
        let replica = self.replicas.by_qualifier(qualifier).cloned().ok_or_else(|| {
            Error::InvalidArgument(format!("No servers found for qualifier {}", qualifier))
        })?;

        let collector = Arc::new(ResponseCollector::<Vec<String>>::new());
        let call = PendingCall::new(OperationKind::GetTupleSpacesState, &replica);
        let client = self.replica_client.clone();
        spawn_call(collector.clone(), call, Duration::ZERO, async move {
            client.get_state(&replica).await
        });

        let responses = collector.wait_until(1).await;
        if let Some(failure) = responses.failures.first() {
            return Err(replica_failure(
                OperationKind::GetTupleSpacesState,
                qualifier,
                attempt,
                failure,
            ));
        }
        match responses.successes.into_iter().next() {
            Some(tuples) => Ok(Outcome::State(tuples)),
            None => Err(no_response(OperationKind::GetTupleSpacesState, qualifier, attempt)),
        }
    }

    /// Issue one call per replica, each on its own task after its own delay
    fn dispatch<T, F, Fut>(&self, operation: OperationKind, call: F) -> Arc<ResponseCollector<T>>
    where
        T: Clone + Send + 'static,
        F: Fn(Arc<dyn ReplicaClient>, ReplicaEntry) -> Fut,
        Fut: Future<Output = std::result::Result<T, RpcError>> + Send + 'static,
    {
        debug_assert_eq!(self.scheduler.len(), self.replicas.len());

        let collector = Arc::new(ResponseCollector::new());
        for index in &self.scheduler {
            let Some(replica) = self.replicas.get(index).cloned() else {
                continue;
            };
            let delay = self.scheduler.delay(index).unwrap_or_default();
            let pending = PendingCall::new(operation, &replica);
            let rpc = call(self.replica_client.clone(), replica);
            spawn_call(collector.clone(), pending, delay, rpc);
        }
        collector
    }
}

fn spawn_call<T, Fut>(
    collector: Arc<ResponseCollector<T>>,
    call: PendingCall,
    delay: Duration,
    rpc: Fut,
) where
    T: Clone + Send + 'static,
    Fut: Future<Output = std::result::Result<T, RpcError>> + Send + 'static,
{
    tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        tracing::debug!(
            "Sending {} to replica {} ({})",
            call.operation,
            call.qualifier,
            call.address
        );
        // A panicking stub still has to count as an answer
        let result = match tokio::spawn(rpc).await {
            Ok(result) => result,
            Err(e) => Err(RpcError::Transport(format!("call aborted: {}", e))),
        };
        match result {
            Ok(payload) => collector.record_success(payload),
            Err(error) => {
                tracing::debug!("{} on replica {} failed: {}", call.operation, call.qualifier, error);
                collector.record_failure(ReplicaFailure { call, error });
            }
        }
    });
}

fn replica_failure(
    operation: OperationKind,
    argument: &str,
    attempts: u32,
    failure: &ReplicaFailure,
) -> Error {
    Error::ReplicaOperationFailure {
        operation,
        argument: argument.to_string(),
        attempts,
        reason: failure.to_string(),
    }
}

fn no_response(operation: OperationKind, argument: &str, attempts: u32) -> Error {
    Error::ReplicaOperationFailure {
        operation,
        argument: argument.to_string(),
        attempts,
        reason: "no replica answered".into(),
    }
}
