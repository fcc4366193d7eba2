//! UseCase: 参加者の照会（Lookup / Enumerate）

use std::sync::Arc;

use crate::domain::{ConnectionId, Participant, ParticipantRepository};

use super::error::RosterQueryError;

/// 参加者照会のユースケース
///
/// 返す値は全て呼び出し時点のスナップショットです。
pub struct GetRosterUseCase {
    repository: Arc<dyn ParticipantRepository>,
}

impl GetRosterUseCase {
    pub fn new(repository: Arc<dyn ParticipantRepository>) -> Self {
        Self { repository }
    }

    pub async fn lookup(&self, id: ConnectionId) -> Result<Participant, RosterQueryError> {
        self.repository
            .find(id)
            .await
            .ok_or(RosterQueryError::NotFound(id))
    }

    /// 参加順の参加者一覧
    pub async fn enumerate(&self) -> Vec<Participant> {
        self.repository.list().await
    }

    pub async fn capacity(&self) -> usize {
        self.repository.capacity().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::Color,
        usecase::test_support::{participant, repository, seed},
    };

    #[tokio::test]
    async fn test_lookup_after_leave_is_not_found() {
        // テスト項目: 退出後の Lookup は NotFound になる
        // given (前提条件):
        let repository = repository(4);
        let usecase = GetRosterUseCase::new(repository.clone());
        seed(&repository, &[participant(1, "alice", Color::WHITE)]).await;
        assert!(usecase.lookup(ConnectionId::new(1)).await.is_ok());

        // when (操作):
        repository.remove(ConnectionId::new(1)).await;
        let result = usecase.lookup(ConnectionId::new(1)).await;

        // then (期待する結果):
        assert_eq!(result, Err(RosterQueryError::NotFound(ConnectionId::new(1))));
    }

    #[tokio::test]
    async fn test_enumerate_returns_join_order() {
        // テスト項目: Enumerate は参加順のスナップショットを返す
        // given (前提条件):
        let repository = repository(4);
        let usecase = GetRosterUseCase::new(repository.clone());
        seed(
            &repository,
            &[
                participant(5, "eve", Color::WHITE),
                participant(2, "bob", Color::WHITE),
            ],
        )
        .await;

        // when (操作):
        let participants = usecase.enumerate().await;

        // then (期待する結果):
        let ids: Vec<u64> = participants.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![5, 2]);
        assert_eq!(usecase.capacity().await, 4);
    }
}
