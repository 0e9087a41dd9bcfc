//! Operation kinds and user-facing outcomes

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::common::Error;

/// Logical operations a client can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Put,
    Read,
    Take,
    GetTupleSpacesState,
}

impl OperationKind {
    /// Needs a sequence number and every replica's acknowledgement
    pub fn is_ordered(&self) -> bool {
        matches!(self, OperationKind::Put | OperationKind::Take)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Put => "put",
            OperationKind::Read => "read",
            OperationKind::Take => "take",
            OperationKind::GetTupleSpacesState => "getTupleSpacesState",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "put" => Ok(OperationKind::Put),
            "read" => Ok(OperationKind::Read),
            "take" => Ok(OperationKind::Take),
            "getTupleSpacesState" => Ok(OperationKind::GetTupleSpacesState),
            other => Err(Error::InvalidArgument(format!("unknown command: {}", other))),
        }
    }
}

/// Result of a completed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `put` carries no payload
    Done,
    /// Tuple matched by `read` or removed by `take`
    Tuple(String),
    /// One replica's full contents
    State(Vec<String>),
}

impl Outcome {
    pub fn tuple(&self) -> Option<&str> {
        match self {
            Outcome::Tuple(t) => Some(t),
            _ => None,
        }
    }
}

/// Rendered as the interactive client prints it: `OK`, payload, blank line
impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "OK")?;
        match self {
            Outcome::Done => {}
            Outcome::Tuple(t) => writeln!(f, "{}", t)?,
            Outcome::State(tuples) => writeln!(f, "[{}]", tuples.join(", "))?,
        }
        Ok(())
    }
}
