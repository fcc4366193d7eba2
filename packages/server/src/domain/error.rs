//! Domain error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Display name is empty after trimming
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// Message body is empty after trimming
    #[error("message body must not be empty")]
    EmptyMessageBody,

    /// Colour is not a `#RRGGBB` hex string
    #[error("invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
}

/// Roster aggregate errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The connection already has a participant
    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    /// The roster is at capacity
    #[error("roster is full (capacity: {capacity})")]
    Full { capacity: usize },
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("participant capacity exceeded (capacity: {capacity})")]
    CapacityExceeded { capacity: usize },
}

impl From<RosterError> for RepositoryError {
    fn from(error: RosterError) -> Self {
        match error {
            RosterError::DuplicateConnection(id) => Self::DuplicateConnection(id),
            RosterError::Full { capacity } => Self::CapacityExceeded { capacity },
        }
    }
}

/// Message delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection {0} not found")]
    ClientNotFound(ConnectionId),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
