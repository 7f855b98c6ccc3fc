//! Tool dispatch errors.
//!
//! Failures are tagged values that cross component boundaries as data,
//! never as unwinding panics. A server serializes the message into
//! `ProtocolResponse.error`; the client rehydrates a set `error` as
//! [`ToolError::Execution`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    /// `tools/call` named a tool the server never registered.
    #[error("Tool {0} not found")]
    ToolNotFound(String),

    /// The client directory has no server under this name.
    #[error("Server {0} not found")]
    ServerNotFound(String),

    /// The request method is not part of the protocol surface.
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    /// A handler's declared argument key was absent.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// An argument was present but had the wrong shape.
    #[error("Invalid argument {key}: expected {expected}")]
    InvalidArgument { key: String, expected: &'static str },

    /// A requested entity (verification result, stored record) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A handler failed during execution; captured at the server boundary.
    #[error("{0}")]
    Execution(String),

    /// Opaque failure from an external collaborator boundary.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Coarse classification used by callers that branch on failure class
/// rather than on the individual variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ProtocolFailure,
    ExecutionFailure,
    TransportFailure,
}

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::ServerNotFound(_) | ToolError::NotFound(_) => ErrorKind::NotFound,
            ToolError::ToolNotFound(_)
            | ToolError::UnknownMethod(_)
            | ToolError::MissingArgument(_)
            | ToolError::InvalidArgument { .. } => ErrorKind::ProtocolFailure,
            ToolError::Execution(_) => ErrorKind::ExecutionFailure,
            ToolError::Transport(_) => ErrorKind::TransportFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_protocol_contract() {
        assert_eq!(
            ToolError::ToolNotFound("frobnicate".into()).to_string(),
            "Tool frobnicate not found"
        );
        assert_eq!(
            ToolError::UnknownMethod("tools/write".into()).to_string(),
            "Unknown method: tools/write"
        );
    }

    #[test]
    fn kinds_partition_the_taxonomy() {
        assert_eq!(
            ToolError::NotFound("no result".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ToolError::MissingArgument("request_id".into()).kind(),
            ErrorKind::ProtocolFailure
        );
        assert_eq!(
            ToolError::Execution("boom".into()).kind(),
            ErrorKind::ExecutionFailure
        );
        assert_eq!(
            ToolError::Transport("backend unreachable".into()).kind(),
            ErrorKind::TransportFailure
        );
    }
}
