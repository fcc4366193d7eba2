//! InMemory Participant Repository 実装
//!
//! ドメイン層が定義する ParticipantRepository trait の具体的な実装。
//! Roster ドメインモデルをそのままインメモリストレージとして使用します。
//! セッション状態はプロセス内にのみ存在し、永続化は行いません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Color, ConnectionId, DisplayName, Participant, ParticipantRepository, RepositoryError, Roster,
};

/// インメモリ Participant Repository 実装
pub struct InMemoryParticipantRepository {
    roster: Arc<Mutex<Roster>>,
}

impl InMemoryParticipantRepository {
    pub fn new(roster: Arc<Mutex<Roster>>) -> Self {
        Self { roster }
    }

    /// 指定した定員の空の Roster で作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Arc::new(Mutex::new(Roster::with_capacity(capacity))))
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError> {
        let mut roster = self.roster.lock().await;
        roster.add(participant)?;
        Ok(())
    }

    async fn remove(&self, id: ConnectionId) -> Option<Participant> {
        let mut roster = self.roster.lock().await;
        roster.remove(id)
    }

    async fn remove_all(&self) -> Vec<Participant> {
        let mut roster = self.roster.lock().await;
        roster.drain()
    }

    async fn find(&self, id: ConnectionId) -> Option<Participant> {
        let roster = self.roster.lock().await;
        roster.find(id).cloned()
    }

    async fn rename(&self, id: ConnectionId, name: DisplayName) -> Option<Participant> {
        let mut roster = self.roster.lock().await;
        let participant = roster.find_mut(id)?;
        participant.name = name;
        Some(participant.clone())
    }

    async fn recolor(&self, id: ConnectionId, color: Color) -> Option<Participant> {
        let mut roster = self.roster.lock().await;
        let participant = roster.find_mut(id)?;
        participant.color = color;
        Some(participant.clone())
    }

    async fn list(&self) -> Vec<Participant> {
        let roster = self.roster.lock().await;
        roster.participants().to_vec()
    }

    async fn count(&self) -> usize {
        let roster = self.roster.lock().await;
        roster.len()
    }

    async fn capacity(&self) -> usize {
        let roster = self.roster.lock().await;
        roster.capacity()
    }
}
