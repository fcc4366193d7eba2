//! UseCase: 参加者の参加処理（OnJoin）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinParticipantUseCase::execute() メソッド
//! - 既定の名前・色の割り当て、定員・重複チェック、参加通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の参加と、本人への Welcome / 他の参加者への通知
//! - 異常系：定員超過（SessionFull）、同じ接続の二重参加（DuplicateConnection）

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    ConnectionId, IdentityGenerator, MessagePusher, Participant, ParticipantRepository,
    PusherChannel, RepositoryError, ServerEvent, Timestamp,
};

use super::error::JoinError;

/// 参加者参加のユースケース
pub struct JoinParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    identity: Arc<dyn IdentityGenerator>,
    clock: Arc<dyn Clock>,
}

impl JoinParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        identity: Arc<dyn IdentityGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            identity,
            clock,
        }
    }

    /// 参加を実行
    ///
    /// 1. 既定の名前と色で参加者を作成し Roster に追加
    /// 2. 接続の送信チャンネルを MessagePusher に登録
    /// 3. 本人に Welcome（ハンドシェイク応答）を送信
    /// 4. 他の全参加者に参加を通知
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 作成された参加者
    /// * `Err(JoinError)` - 定員超過または重複接続。参加者は作成されない
    pub async fn execute(
        &self,
        id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<Participant, JoinError> {
        let participant = Participant::new(
            id,
            self.identity.display_name(),
            self.identity.color(),
            Timestamp::new(self.clock.now_millis()),
        );

        self.repository
            .insert(participant.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateConnection(id) => JoinError::DuplicateConnection(id),
                RepositoryError::CapacityExceeded { capacity } => {
                    JoinError::SessionFull { capacity }
                }
            })?;

        self.message_pusher.register_client(id, sender).await;

        let participants = self.repository.list().await;
        let others: Vec<ConnectionId> = participants
            .iter()
            .map(|p| p.id)
            .filter(|other| *other != id)
            .collect();

        let welcome = ServerEvent::Welcome {
            you: participant.clone(),
            participants,
        };
        if let Err(e) = self.message_pusher.push_to(id, &welcome).await {
            tracing::warn!("Failed to send welcome to connection {}: {}", id, e);
        }

        let joined = ServerEvent::RosterChanged {
            participant: participant.clone(),
            joined: true,
        };
        if let Err(e) = self.message_pusher.broadcast(others, &joined).await {
            tracing::warn!("Failed to announce connection {}: {}", id, e);
        }

        Ok(participant)
    }
}
