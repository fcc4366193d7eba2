//! UseCase: メッセージ送信と中継（Submit / Relay）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitMessageUseCase::execute() / relay()
//!
//! ### なぜこのテストが必要か
//! - 送信者は接続から解決され、本人を含む全員に中継されることを保証
//! - 空白のみの入力や退出済みの送信者は中継されないことを保証
//! - 同じ送信者のメッセージが送信順に中継されること（FIFO）を保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：1人 / 複数人への中継
//! - エッジケース：空白のみのメッセージ、退出済みの接続からの送信

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    ChatEvent, ConnectionId, MessageBody, MessagePusher, ParticipantRepository, ServerEvent,
    Timestamp,
};

/// メッセージ送信のユースケース
pub struct SubmitMessageUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SubmitMessageUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 本文は前後の空白を除去し、空になった場合は何もしません。送信者は
    /// `id` から Roster で解決し、見つからなければ（切断と競合した場合）
    /// 診断ログを残して破棄します。いずれもエラーにはしません。
    ///
    /// # Returns
    ///
    /// 中継した ChatEvent（破棄した場合は `None`）
    pub async fn execute(&self, id: ConnectionId, raw_text: &str) -> Option<ChatEvent> {
        let Ok(body) = MessageBody::new(raw_text) else {
            return None;
        };

        let Some(sender) = self.repository.find(id).await else {
            tracing::warn!(
                "Discarding message from connection {}: sender not in roster",
                id
            );
            return None;
        };

        let event =
            ChatEvent::from_participant(&sender, body, Timestamp::new(self.clock.now_millis()));
        tracing::info!("[chat] {}: {}", event.sender_name, event.body.as_str());
        self.relay(&event).await;

        Some(event)
    }

    /// ChatEvent を送信者本人を含む全参加者に中継する
    ///
    /// 送信者も他の参加者と同じ経路で自分のメッセージを受け取ります。
    ///
    /// # Returns
    ///
    /// 中継対象の接続 ID（参加順）
    pub async fn relay(&self, event: &ChatEvent) -> Vec<ConnectionId> {
        let targets: Vec<ConnectionId> =
            self.repository.list().await.iter().map(|p| p.id).collect();

        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &ServerEvent::Chat(event.clone()))
            .await
        {
            tracing::warn!("Failed to relay message from {}: {}", event.sender, e);
        }

        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Color, MockMessagePusher},
        usecase::test_support::{
            FIXED_TIME, RecordingPusher, clock, participant, repository, seed,
        },
    };

    #[tokio::test]
    async fn test_submit_relays_trimmed_text_to_sender() {
        // テスト項目: join(1) → Submit(1, "  hello  ") で {1} に "hello" が中継される
        // given (前提条件):
        let repository = repository(4);
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = SubmitMessageUseCase::new(repository.clone(), pusher.clone(), clock());
        let alice = participant(1, "alice", Color::rgb(255, 200, 128));
        seed(&repository, &[alice.clone()]).await;

        // when (操作):
        let event = usecase.execute(ConnectionId::new(1), "  hello  ").await;

        // then (期待する結果):
        let event = event.unwrap();
        assert_eq!(event.sender, ConnectionId::new(1));
        assert_eq!(event.body.as_str(), "hello");
        assert_eq!(event.color, Color::rgb(255, 200, 128));
        assert_eq!(event.sent_at, Timestamp::new(FIXED_TIME));
        assert_eq!(
            pusher.broadcasts(),
            vec![(vec![ConnectionId::new(1)], ServerEvent::Chat(event))]
        );
    }

    #[tokio::test]
    async fn test_submit_blank_text_is_not_relayed() {
        // テスト項目: Submit(1, "   ") では中継が一切行われない
        // given (前提条件):
        let repository = repository(4);
        seed(&repository, &[participant(1, "alice", Color::WHITE)]).await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase = SubmitMessageUseCase::new(repository, Arc::new(pusher), clock());

        // when (操作):
        let blank = usecase.execute(ConnectionId::new(1), "   ").await;
        let empty = usecase.execute(ConnectionId::new(1), "").await;

        // then (期待する結果):
        assert!(blank.is_none());
        assert!(empty.is_none());
    }

    #[tokio::test]
    async fn test_submit_from_departed_sender_is_discarded() {
        // テスト項目: join(1), join(2), leave(1) の後の Submit(1, "hi") は破棄される
        // given (前提条件):
        let repository = repository(4);
        seed(
            &repository,
            &[
                participant(1, "alice", Color::WHITE),
                participant(2, "bob", Color::WHITE),
            ],
        )
        .await;
        repository.remove(ConnectionId::new(1)).await;
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().times(0);
        let usecase = SubmitMessageUseCase::new(repository, Arc::new(pusher), clock());

        // when (操作):
        let result = usecase.execute(ConnectionId::new(1), "hi").await;

        // then (期待する結果):
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_relay_reaches_every_participant_identically() {
        // テスト項目: N 人に中継された ChatEvent は送信者を含む全員に同一の内容で届く
        // given (前提条件):
        let repository = repository(4);
        seed(
            &repository,
            &[
                participant(1, "alice", Color::RED),
                participant(2, "bob", Color::WHITE),
                participant(3, "charlie", Color::WHITE),
            ],
        )
        .await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, event| {
                let ServerEvent::Chat(chat) = event else {
                    return false;
                };
                targets.len() == 3
                    && targets.contains(&ConnectionId::new(2))
                    && chat.sender == ConnectionId::new(2)
                    && chat.sender_name.as_str() == "bob"
                    && chat.body.as_str() == "yo"
                    && chat.color == Color::WHITE
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = SubmitMessageUseCase::new(repository, Arc::new(pusher), clock());

        // when (操作):
        let result = usecase.execute(ConnectionId::new(2), "yo").await;

        // then (期待する結果):
        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_successive_submits_are_relayed_in_order() {
        // テスト項目: 同じ送信者の連続した Submit は送信順に1回ずつ中継される（FIFO）
        // given (前提条件):
        let repository = repository(4);
        let pusher = Arc::new(RecordingPusher::default());
        let usecase = SubmitMessageUseCase::new(repository.clone(), pusher.clone(), clock());
        seed(&repository, &[participant(1, "alice", Color::WHITE)]).await;

        // when (操作):
        for text in ["first", "   ", "second", "third"] {
            usecase.execute(ConnectionId::new(1), text).await;
        }

        // then (期待する結果):
        let bodies: Vec<String> = pusher
            .broadcasts()
            .into_iter()
            .filter_map(|(_, event)| match event {
                ServerEvent::Chat(chat) => Some(chat.body.into_string()),
                _ => None,
            })
            .collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
    }
}
