//! Conversion logic between DTOs and domain entities.

use parlor_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatEvent, Participant, ServerEvent};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Participant> for dto::ParticipantInfo {
    fn from(model: &Participant) -> Self {
        Self {
            connection_id: model.id.value(),
            name: model.name.as_str().to_string(),
            color: model.color.to_hex(),
        }
    }
}

impl From<&Participant> for http::ParticipantDetailDto {
    fn from(model: &Participant) -> Self {
        Self {
            connection_id: model.id.value(),
            name: model.name.as_str().to_string(),
            color: model.color.to_hex(),
            joined_at: timestamp_to_rfc3339(model.joined_at.value()),
        }
    }
}

impl From<&ChatEvent> for dto::ChatEventMessage {
    fn from(model: &ChatEvent) -> Self {
        Self {
            r#type: dto::MessageType::ChatEvent,
            sender_id: model.sender.value(),
            sender_name: model.sender_name.as_str().to_string(),
            text: model.body.as_str().to_string(),
            color: model.color.to_hex(),
            sent_at: model.sent_at.value(),
        }
    }
}

impl From<&ServerEvent> for dto::ServerMessage {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Welcome { you, participants } => {
                Self::JoinAccepted(dto::JoinAcceptedMessage {
                    r#type: dto::MessageType::JoinAccepted,
                    connection_id: you.id.value(),
                    name: you.name.as_str().to_string(),
                    color: you.color.to_hex(),
                    participants: participants.iter().map(Into::into).collect(),
                })
            }
            ServerEvent::Chat(chat) => Self::ChatEvent(chat.into()),
            ServerEvent::RosterChanged {
                participant,
                joined,
            } => Self::RosterUpdate(dto::RosterUpdateMessage {
                r#type: dto::MessageType::RosterUpdate,
                connection_id: participant.id.value(),
                name: participant.name.as_str().to_string(),
                color: participant.color.to_hex(),
                joined: *joined,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, ConnectionId, DisplayName, MessageBody, Timestamp};

    fn alice() -> Participant {
        Participant::new(
            ConnectionId::new(1),
            DisplayName::new("alice").unwrap(),
            Color::rgb(0x80, 0xA0, 0xFF),
            Timestamp::new(1672531200000),
        )
    }

    #[test]
    fn test_welcome_to_join_accepted() {
        // テスト項目: Welcome イベントが join-accepted フレームに変換される
        // given (前提条件):
        let event = ServerEvent::Welcome {
            you: alice(),
            participants: vec![alice()],
        };

        // when (操作):
        let message: dto::ServerMessage = (&event).into();

        // then (期待する結果):
        let dto::ServerMessage::JoinAccepted(accepted) = message else {
            panic!("expected join-accepted");
        };
        assert_eq!(accepted.connection_id, 1);
        assert_eq!(accepted.name, "alice");
        assert_eq!(accepted.color, "#80A0FF");
        assert_eq!(accepted.participants.len(), 1);
    }

    #[test]
    fn test_chat_event_to_dto() {
        // テスト項目: ChatEvent が chat-event フレームに変換される
        // given (前提条件):
        let event = ChatEvent::from_participant(
            &alice(),
            MessageBody::new("hello").unwrap(),
            Timestamp::new(2000),
        );

        // when (操作):
        let message = dto::ChatEventMessage::from(&event);

        // then (期待する結果):
        assert_eq!(message.r#type, dto::MessageType::ChatEvent);
        assert_eq!(message.sender_id, 1);
        assert_eq!(message.sender_name, "alice");
        assert_eq!(message.text, "hello");
        assert_eq!(message.color, "#80A0FF");
        assert_eq!(message.sent_at, 2000);
    }

    #[test]
    fn test_roster_changed_to_roster_update() {
        // テスト項目: 退出イベントが joined=false の roster-update に変換される
        // given (前提条件):
        let event = ServerEvent::RosterChanged {
            participant: alice(),
            joined: false,
        };

        // when (操作):
        let message: dto::ServerMessage = (&event).into();

        // then (期待する結果):
        let dto::ServerMessage::RosterUpdate(update) = message else {
            panic!("expected roster-update");
        };
        assert_eq!(update.connection_id, 1);
        assert!(!update.joined);
    }

    #[test]
    fn test_participant_to_http_detail() {
        // テスト項目: 参加者が HTTP 用 DTO に変換され、参加時刻が RFC 3339 になる
        // given (前提条件):
        let participant = alice();

        // when (操作):
        let detail = http::ParticipantDetailDto::from(&participant);

        // then (期待する結果):
        assert_eq!(detail.connection_id, 1);
        assert!(detail.joined_at.starts_with("2023-01-01T00:00:00"));
    }
}
