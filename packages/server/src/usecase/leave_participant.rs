//! UseCase: 参加者の退出処理（OnLeave）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveParticipantUseCase::execute() / evict_all()
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と残りの参加者への通知
//! - エッジケース：未登録・退出済みの接続の退出（冪等、何もしない）
//! - サーバー停止時の全員の退出

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, Participant, ParticipantRepository, ServerEvent};

/// 参加者退出のユースケース
pub struct LeaveParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 退出を実行
    ///
    /// 未登録の接続に対しては何もせず `None` を返します。トランスポートから
    /// 切断通知が重複して届いても安全です。
    pub async fn execute(&self, id: ConnectionId) -> Option<Participant> {
        self.message_pusher.unregister_client(id).await;

        let Some(removed) = self.repository.remove(id).await else {
            tracing::debug!("Connection {} left without a participant, ignoring", id);
            return None;
        };

        let remaining: Vec<ConnectionId> =
            self.repository.list().await.iter().map(|p| p.id).collect();
        let left = ServerEvent::RosterChanged {
            participant: removed.clone(),
            joined: false,
        };
        if let Err(e) = self.message_pusher.broadcast(remaining, &left).await {
            tracing::warn!("Failed to announce departure of connection {}: {}", id, e);
        }

        Some(removed)
    }

    /// 全参加者を退出させる（サーバー停止時）
    ///
    /// 送信チャンネルを全て破棄するため、各接続は閉じられます。
    /// 全員が同時に去るので退出通知は送りません。
    pub async fn evict_all(&self) -> Vec<Participant> {
        let unregistered = self.message_pusher.unregister_all().await;
        let evicted = self.repository.remove_all().await;
        tracing::info!(
            "Evicted {} participants ({} connections closed)",
            evicted.len(),
            unregistered.len()
        );
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Color,
        usecase::test_support::{RecordingPusher, participant, repository, seed},
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_leave_notifies_remaining_participants() {
        // テスト項目: 退出すると Roster から削除され、残りの参加者に通知される
        // given (前提条件):
        let repository = repository(4);
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = LeaveParticipantUseCase::new(repository.clone(), pusher.clone());
        let alice = participant(1, "alice", Color::WHITE);
        let bob = participant(2, "bob", Color::WHITE);
        seed(&repository, &[alice.clone(), bob]).await;

        // when (操作):
        let removed = usecase.execute(ConnectionId::new(1)).await;

        // then (期待する結果):
        assert_eq!(removed, Some(alice.clone()));
        assert!(repository.find(ConnectionId::new(1)).await.is_none());
        assert_eq!(
            pusher.broadcasts(),
            vec![(
                vec![ConnectionId::new(2)],
                ServerEvent::RosterChanged {
                    participant: alice,
                    joined: false,
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_leave_unknown_connection_is_noop() {
        // テスト項目: 未登録の接続の退出は何もしない（冪等性）
        // given (前提条件):
        let repository = repository(4);
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = LeaveParticipantUseCase::new(repository.clone(), pusher.clone());
        seed(&repository, &[participant(1, "alice", Color::WHITE)]).await;
        usecase.execute(ConnectionId::new(1)).await;

        // when (操作):
        let second = usecase.execute(ConnectionId::new(1)).await;
        let unknown = usecase.execute(ConnectionId::new(99)).await;

        // then (期待する結果):
        assert_eq!(second, None);
        assert_eq!(unknown, None);
        assert_eq!(pusher.broadcasts().len(), 1);
    }

    #[tokio::test]
    async fn test_evict_all_empties_roster_and_channels() {
        // テスト項目: evict_all で全員が退出し、送信チャンネルも全て破棄される
        // given (前提条件):
        let repository = repository(4);
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = LeaveParticipantUseCase::new(repository.clone(), pusher.clone());
        seed(
            &repository,
            &[
                participant(1, "alice", Color::WHITE),
                participant(2, "bob", Color::WHITE),
            ],
        )
        .await;
        for id in [1, 2] {
            let (tx, _rx) = mpsc::unbounded_channel();
            pusher.register_client(ConnectionId::new(id), tx).await;
        }

        // when (操作):
        let evicted = usecase.evict_all().await;

        // then (期待する結果):
        assert_eq!(evicted.len(), 2);
        assert_eq!(repository.count().await, 0);
        assert!(pusher.registered().is_empty());
        assert!(pusher.broadcasts().is_empty());
    }
}
