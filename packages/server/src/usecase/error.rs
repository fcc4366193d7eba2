//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::ConnectionId;

/// 参加処理のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The same connection joined twice without leaving; a transport bug
    #[error("connection {0} is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("session is full (capacity: {capacity})")]
    SessionFull { capacity: usize },

    /// The server is shutting down or already stopped
    #[error("session is not accepting participants")]
    Unavailable,
}

/// 参加者照会のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterQueryError {
    #[error("participant {0} not found")]
    NotFound(ConnectionId),
}
