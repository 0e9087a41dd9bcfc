//! Error types for tuplespaces

use thiserror::Error;

use crate::client::OperationKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Local Errors ===
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // === Ordering Errors ===
    #[error("Couldn't get a sequence number from the sequencer: {0}")]
    OrderingUnavailable(String),

    // === Discovery Errors ===
    #[error("Failed communicating with name server: {0}")]
    DiscoveryUnavailable(String),

    #[error("No servers available for service {service} (qualifier: {qualifier})")]
    NoReplicasFound { service: String, qualifier: String },

    // === Replica Errors ===
    #[error(
        "Couldn't complete {operation} with argument {argument} after {attempts} attempt(s): {reason}"
    )]
    ReplicaOperationFailure {
        operation: OperationKind,
        argument: String,
        attempts: u32,
        reason: String,
    },

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Does the coordinator's rediscover-and-retry path apply to this error?
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ReplicaOperationFailure { .. })
    }

    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "invalid_argument",
            Error::OrderingUnavailable(_) => "ordering_unavailable",
            Error::DiscoveryUnavailable(_) => "discovery_unavailable",
            Error::NoReplicasFound { .. } => "no_replicas_found",
            Error::ReplicaOperationFailure { .. } => "replica_operation_failure",
            Error::InvalidConfig(_) => "invalid_config",
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_replica_failures_are_retryable() {
        let failure = Error::ReplicaOperationFailure {
            operation: OperationKind::Put,
            argument: "<a,1>".into(),
            attempts: 1,
            reason: "unavailable".into(),
        };
        assert!(failure.is_retryable());
        assert!(!Error::InvalidArgument("abc".into()).is_retryable());
        assert!(!Error::OrderingUnavailable("down".into()).is_retryable());
        assert!(!Error::DiscoveryUnavailable("down".into()).is_retryable());
    }

    #[test]
    fn test_failure_message_carries_context() {
        let failure = Error::ReplicaOperationFailure {
            operation: OperationKind::Take,
            argument: "<a,*>".into(),
            attempts: 2,
            reason: "replica B: status 500".into(),
        };
        let msg = failure.to_string();
        assert!(msg.contains("take"));
        assert!(msg.contains("<a,*>"));
        assert!(msg.contains("2 attempt(s)"));
        assert_eq!(failure.kind(), "replica_operation_failure");
    }
}
