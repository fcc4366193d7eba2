//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object with a kebab-case `type` discriminator.
//! Decoding first reads only the discriminator, then the matching frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    // client -> server
    Join,
    Chat,
    Rename,
    Color,
    // server -> client
    JoinAccepted,
    JoinRejected,
    ChatEvent,
    RosterUpdate,
}

/// Why a join request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    SessionFull,
    Unavailable,
    Internal,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unexpected frame type: {0:?}")]
    UnexpectedType(MessageType),
}

#[derive(Deserialize)]
struct Envelope {
    r#type: MessageType,
}

// ========================================
// client -> server
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequestMessage {
    pub r#type: MessageType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSubmitMessage {
    pub r#type: MessageType,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRequestMessage {
    pub r#type: MessageType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRequestMessage {
    pub r#type: MessageType,
    pub color: String,
}

/// Any frame a client may send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Join(JoinRequestMessage),
    Chat(ChatSubmitMessage),
    Rename(RenameRequestMessage),
    Color(ColorRequestMessage),
}

impl ClientMessage {
    pub fn join() -> Self {
        Self::Join(JoinRequestMessage {
            r#type: MessageType::Join,
        })
    }

    pub fn chat(text: impl Into<String>) -> Self {
        Self::Chat(ChatSubmitMessage {
            r#type: MessageType::Chat,
            text: text.into(),
        })
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self::Rename(RenameRequestMessage {
            r#type: MessageType::Rename,
            name: name.into(),
        })
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self::Color(ColorRequestMessage {
            r#type: MessageType::Color,
            color: color.into(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let message = match envelope.r#type {
            MessageType::Join => Self::Join(serde_json::from_str(text)?),
            MessageType::Chat => Self::Chat(serde_json::from_str(text)?),
            MessageType::Rename => Self::Rename(serde_json::from_str(text)?),
            MessageType::Color => Self::Color(serde_json::from_str(text)?),
            other => return Err(DecodeError::UnexpectedType(other)),
        };
        Ok(message)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Join(msg) => serde_json::to_string(msg),
            Self::Chat(msg) => serde_json::to_string(msg),
            Self::Rename(msg) => serde_json::to_string(msg),
            Self::Color(msg) => serde_json::to_string(msg),
        }
    }
}

// ========================================
// server -> client
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub connection_id: u64,
    pub name: String,
    pub color: String,
}

/// Handshake acknowledgement: who you are and who is here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinAcceptedMessage {
    pub r#type: MessageType,
    pub connection_id: u64,
    pub name: String,
    pub color: String,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRejectedMessage {
    pub r#type: MessageType,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEventMessage {
    pub r#type: MessageType,
    pub sender_id: u64,
    pub sender_name: String,
    pub text: String,
    pub color: String,
    pub sent_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterUpdateMessage {
    pub r#type: MessageType,
    pub connection_id: u64,
    pub name: String,
    pub color: String,
    pub joined: bool,
}

/// Any frame the server may send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    JoinAccepted(JoinAcceptedMessage),
    JoinRejected(JoinRejectedMessage),
    ChatEvent(ChatEventMessage),
    RosterUpdate(RosterUpdateMessage),
}

impl ServerMessage {
    pub fn join_rejected(reason: RejectReason) -> Self {
        Self::JoinRejected(JoinRejectedMessage {
            r#type: MessageType::JoinRejected,
            reason,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        let message = match envelope.r#type {
            MessageType::JoinAccepted => Self::JoinAccepted(serde_json::from_str(text)?),
            MessageType::JoinRejected => Self::JoinRejected(serde_json::from_str(text)?),
            MessageType::ChatEvent => Self::ChatEvent(serde_json::from_str(text)?),
            MessageType::RosterUpdate => Self::RosterUpdate(serde_json::from_str(text)?),
            other => return Err(DecodeError::UnexpectedType(other)),
        };
        Ok(message)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::JoinAccepted(msg) => serde_json::to_string(msg),
            Self::JoinRejected(msg) => serde_json::to_string(msg),
            Self::ChatEvent(msg) => serde_json::to_string(msg),
            Self::RosterUpdate(msg) => serde_json::to_string(msg),
        }
    }
}
