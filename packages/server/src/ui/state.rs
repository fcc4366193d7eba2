//! Server state shared by the axum handlers.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{domain::ConnectionId, usecase::GetRosterUseCase};

use super::hub::HubHandle;

/// Shared application state
pub struct AppState {
    /// 参加者の変更は全て hub 経由で行う
    pub hub: HubHandle,
    /// GetRosterUseCase（読み取り専用の照会）
    pub roster: Arc<GetRosterUseCase>,
    next_connection_id: AtomicU64,
}

impl AppState {
    pub fn new(hub: HubHandle, roster: Arc<GetRosterUseCase>) -> Self {
        Self {
            hub,
            roster,
            next_connection_id: AtomicU64::new(1),
        }
    }

    /// Allocates the id for a newly upgraded socket. Ids start at 1 and are
    /// never reused within the process.
    pub fn next_connection_id(&self) -> ConnectionId {
        ConnectionId::new(self.next_connection_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryParticipantRepository;

    #[test]
    fn test_connection_ids_are_monotonic_from_one() {
        // テスト項目: 接続 ID は 1 から単調増加で払い出される
        // given (前提条件):
        let repository = Arc::new(InMemoryParticipantRepository::with_capacity(4));
        let state = AppState::new(
            HubHandle::closed(),
            Arc::new(GetRosterUseCase::new(repository)),
        );

        // when (操作):
        let ids: Vec<u64> = (0..3).map(|_| state.next_connection_id().value()).collect();

        // then (期待する結果):
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
