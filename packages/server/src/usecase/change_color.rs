//! UseCase: 表示色の変更（SetColor）

use std::sync::Arc;

use crate::domain::{
    Color, ConnectionId, MessagePusher, Participant, ParticipantRepository, ServerEvent,
};

/// 表示色変更のユースケース（変更できるのは接続自身の参加者のみ）
pub struct ChangeColorUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ChangeColorUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    pub async fn execute(&self, id: ConnectionId, color: Color) -> Option<Participant> {
        let Some(updated) = self.repository.recolor(id, color).await else {
            tracing::debug!("Color change from unknown connection {} discarded", id);
            return None;
        };

        let everyone: Vec<ConnectionId> =
            self.repository.list().await.iter().map(|p| p.id).collect();
        let changed = ServerEvent::RosterChanged {
            participant: updated.clone(),
            joined: true,
        };
        if let Err(e) = self.message_pusher.broadcast(everyone, &changed).await {
            tracing::warn!("Failed to announce color of connection {}: {}", id, e);
        }

        Some(updated)
    }
}
