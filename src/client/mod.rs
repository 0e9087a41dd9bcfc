//! Client-side replication coordination
//!
//! The client is responsible for:
//! - Replica discovery through the name server
//! - Ordering `put`/`take` with sequence numbers
//! - Staggered dispatch to every replica
//! - Collecting replica replies into one decision

pub mod collector;
pub mod command;
pub mod coordinator;
pub mod delayer;
pub mod operation;
pub mod replica_client;
pub mod replicas;
pub mod sequencer;

pub use collector::{CollectedResponses, ResponseCollector};
pub use command::{parse_line, Command};
pub use coordinator::Coordinator;
pub use delayer::{DispatchOrder, OrderedDelayScheduler};
pub use operation::{OperationKind, Outcome};
pub use replica_client::{PendingCall, ReplicaClient, ReplicaFailure, RpcError};
pub use replicas::{Discovery, ReplicaEntry, ReplicaSet};
pub use sequencer::{SequenceNumber, SequenceSource};
