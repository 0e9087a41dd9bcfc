//! Parsing of interactive client input lines

use std::time::Duration;

use crate::client::operation::OperationKind;
use crate::common::{parse_seconds, Error, Result};

pub const PUT: &str = "put";
pub const READ: &str = "read";
pub const TAKE: &str = "take";
pub const GET_TUPLE_SPACES_STATE: &str = "getTupleSpacesState";
pub const SET_DELAY: &str = "setdelay";
pub const SLEEP: &str = "sleep";
pub const EXIT: &str = "exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A tuple-space operation with its single argument
    Operation {
        kind: OperationKind,
        argument: String,
    },
    /// Administrative delay override for one replica
    SetDelay { qualifier: String, delay: Duration },
    /// Pause the input loop
    Sleep(Duration),
    Exit,
}

/// Parse one input line; blank lines yield `None`.
///
/// Everything after an operation name is its argument, so tuples may
/// contain spaces (`put <a, 1>`).
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        PUT | READ | TAKE | GET_TUPLE_SPACES_STATE => {
            if rest.is_empty() {
                return Err(Error::InvalidArgument(format!("{} expects an argument", name)));
            }
            Command::Operation {
                kind: name.parse()?,
                argument: rest.to_string(),
            }
        }
        SET_DELAY => {
            let mut args = rest.split_whitespace();
            match (args.next(), args.next(), args.next()) {
                (Some(qualifier), Some(secs), None) => Command::SetDelay {
                    qualifier: qualifier.to_string(),
                    delay: parse_seconds(secs)?,
                },
                _ => {
                    return Err(Error::InvalidArgument(
                        "usage: setdelay <qualifier> <seconds>".into(),
                    ))
                }
            }
        }
        SLEEP => Command::Sleep(parse_seconds(rest)?),
        EXIT => Command::Exit,
        other => return Err(Error::InvalidArgument(format!("unknown command: {}", other))),
    };

    Ok(Some(command))
}
