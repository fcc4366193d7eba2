//! Domain entities.

use super::value_object::{Color, ConnectionId, DisplayName, MessageBody, Timestamp};

/// One connected identity, scoped to exactly one live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub name: DisplayName,
    pub color: Color,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, name: DisplayName, color: Color, joined_at: Timestamp) -> Self {
        Self {
            id,
            name,
            color,
            joined_at,
        }
    }
}

/// A chat message on its way from one participant to everyone.
///
/// Name and colour are snapshotted from the sender when the event is created;
/// later renames or colour changes do not rewrite events already relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub sender: ConnectionId,
    pub sender_name: DisplayName,
    pub body: MessageBody,
    pub color: Color,
    pub sent_at: Timestamp,
}

impl ChatEvent {
    pub fn from_participant(sender: &Participant, body: MessageBody, sent_at: Timestamp) -> Self {
        Self {
            sender: sender.id,
            sender_name: sender.name.clone(),
            body,
            color: sender.color,
            sent_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_event_snapshots_sender_identity() {
        // テスト項目: ChatEvent は作成時点の送信者の名前と色を保持し、後の変更に影響されない
        // given (前提条件):
        let mut sender = Participant::new(
            ConnectionId::new(1),
            DisplayName::new("alice").unwrap(),
            Color::rgb(200, 150, 255),
            Timestamp::new(1000),
        );
        let event = ChatEvent::from_participant(
            &sender,
            MessageBody::new("hello").unwrap(),
            Timestamp::new(2000),
        );

        // when (操作):
        sender.name = DisplayName::new("alicia").unwrap();
        sender.color = Color::WHITE;

        // then (期待する結果):
        assert_eq!(event.sender, ConnectionId::new(1));
        assert_eq!(event.sender_name.as_str(), "alice");
        assert_eq!(event.color, Color::rgb(200, 150, 255));
        assert_eq!(event.sent_at, Timestamp::new(2000));
    }
}
