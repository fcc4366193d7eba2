//! MessagePusher trait 定義
//!
//! 参加者への通知手段の抽象化。WebSocket などの具体的な実装は
//! Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{error::MessagePushError, event::ServerEvent, value_object::ConnectionId};

/// Per-connection outbound channel carrying encoded frames.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Delivers server events to connected participants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Start delivering to a connection
    async fn register_client(&self, id: ConnectionId, sender: PusherChannel);

    /// Stop delivering to a connection; dropping its channel closes the socket
    async fn unregister_client(&self, id: ConnectionId);

    /// Drop every channel, returning the ids that were registered
    async fn unregister_all(&self) -> Vec<ConnectionId>;

    /// Unicast to one connection
    async fn push_to(&self, id: ConnectionId, event: &ServerEvent)
    -> Result<(), MessagePushError>;

    /// Fan out to several connections; individual failures are tolerated
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError>;
}
