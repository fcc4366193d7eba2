//! Error types for the chat client.

use std::time::Duration;

use parlor_server::infrastructure::dto::websocket::RejectReason;
use thiserror::Error;

use crate::session::SessionRole;

/// Errors of a single outbound connection
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The server answered the join request with a rejection
    #[error("Join rejected: {0:?}")]
    JoinRejected(RejectReason),

    #[error("Handshake did not complete within {0:?}")]
    HandshakeTimeout(Duration),
}

/// Errors of session role transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session is already active as {0}")]
    AlreadyActive(SessionRole),

    #[error("operation not available while {0}")]
    NotActive(SessionRole),

    #[error("failed to start listening: {0}")]
    BindError(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
