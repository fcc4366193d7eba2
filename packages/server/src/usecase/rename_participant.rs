//! UseCase: 表示名の変更（Rename）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DisplayName, IdentityGenerator, MessagePusher, Participant,
    ParticipantRepository, ServerEvent,
};

/// 表示名変更のユースケース
///
/// 変更できるのは接続自身の参加者のみです。対象は呼び出し側が接続から
/// 解決した `ConnectionId` で指定され、クライアントの申告は使いません。
pub struct RenameParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    identity: Arc<dyn IdentityGenerator>,
}

impl RenameParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        identity: Arc<dyn IdentityGenerator>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            identity,
        }
    }

    /// 表示名を変更し、全参加者に通知する
    ///
    /// 空白のみの名前は失敗にせず、新しい既定名に置き換えます。
    /// 未登録の接続からの要求は破棄して `None` を返します。
    pub async fn execute(&self, id: ConnectionId, requested: &str) -> Option<Participant> {
        let name = DisplayName::new(requested).unwrap_or_else(|_| self.identity.display_name());

        let Some(updated) = self.repository.rename(id, name).await else {
            tracing::debug!("Rename from unknown connection {} discarded", id);
            return None;
        };
        tracing::info!("Connection {} is now known as '{}'", id, updated.name);

        let everyone: Vec<ConnectionId> =
            self.repository.list().await.iter().map(|p| p.id).collect();
        let changed = ServerEvent::RosterChanged {
            participant: updated.clone(),
            joined: true,
        };
        if let Err(e) = self.message_pusher.broadcast(everyone, &changed).await {
            tracing::warn!("Failed to announce rename of connection {}: {}", id, e);
        }

        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Color,
        usecase::test_support::{RecordingPusher, identity, participant, repository, seed},
    };

    fn setup() -> (
        RenameParticipantUseCase,
        Arc<crate::infrastructure::repository::InMemoryParticipantRepository>,
        Arc<RecordingPusher>,
    ) {
        let repository = repository(4);
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = RenameParticipantUseCase::new(
            repository.clone(),
            pusher.clone(),
            identity("Player4321", Color::WHITE),
        );
        (usecase, repository, pusher)
    }

    #[tokio::test]
    async fn test_rename_updates_and_notifies_everyone() {
        // テスト項目: 名前が変更され、本人を含む全参加者に通知される
        // given (前提条件):
        let (usecase, repository, pusher) = setup();
        seed(
            &repository,
            &[
                participant(1, "alice", Color::WHITE),
                participant(2, "bob", Color::WHITE),
            ],
        )
        .await;

        // when (操作):
        let updated = usecase.execute(ConnectionId::new(1), "  alicia ").await;

        // then (期待する結果):
        let updated = updated.unwrap();
        assert_eq!(updated.name.as_str(), "alicia");
        let stored = repository.find(ConnectionId::new(1)).await.unwrap();
        assert_eq!(stored.name.as_str(), "alicia");
        let broadcasts = pusher.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(
            broadcasts[0].0,
            vec![ConnectionId::new(1), ConnectionId::new(2)]
        );
    }

    #[tokio::test]
    async fn test_rename_blank_substitutes_default() {
        // テスト項目: 空白のみの名前は失敗せず、既定名に置き換えられる
        // given (前提条件):
        let (usecase, repository, _pusher) = setup();
        seed(&repository, &[participant(1, "alice", Color::WHITE)]).await;

        // when (操作):
        let updated = usecase.execute(ConnectionId::new(1), "   ").await;

        // then (期待する結果):
        assert_eq!(updated.unwrap().name.as_str(), "Player4321");
    }

    #[tokio::test]
    async fn test_rename_unknown_connection_is_discarded() {
        // テスト項目: 未登録の接続からの名前変更は破棄される
        // given (前提条件):
        let (usecase, repository, pusher) = setup();
        seed(&repository, &[participant(1, "alice", Color::WHITE)]).await;

        // when (操作):
        let updated = usecase.execute(ConnectionId::new(2), "mallory").await;

        // then (期待する結果):
        assert!(updated.is_none());
        let alice = repository.find(ConnectionId::new(1)).await.unwrap();
        assert_eq!(alice.name.as_str(), "alice");
        assert!(pusher.broadcasts().is_empty());
    }
}
