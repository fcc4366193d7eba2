//! Client-side projection of the server roster.
//!
//! The server is the source of truth. The mirror is rebuilt from
//! `join-accepted` and then kept current by `roster-update` frames; nothing
//! on the client ever writes to it otherwise.

use std::sync::Arc;

use parlor_server::{
    domain::Color,
    infrastructure::dto::websocket::{JoinAcceptedMessage, ParticipantInfo, RosterUpdateMessage},
};
use tokio::sync::Mutex;

/// Mirror shared between the connection reader and the session manager
pub type SharedMirror = Arc<Mutex<RosterMirror>>;

/// One participant as seen by this client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    pub connection_id: u64,
    pub name: String,
    pub color: Color,
}

impl From<&ParticipantInfo> for ParticipantView {
    fn from(info: &ParticipantInfo) -> Self {
        Self {
            connection_id: info.connection_id,
            name: info.name.clone(),
            color: parse_color(&info.color),
        }
    }
}

impl From<&RosterUpdateMessage> for ParticipantView {
    fn from(update: &RosterUpdateMessage) -> Self {
        Self {
            connection_id: update.connection_id,
            name: update.name.clone(),
            color: parse_color(&update.color),
        }
    }
}

/// Colours from the wire fall back to white rather than failing the frame
pub fn parse_color(hex: &str) -> Color {
    Color::from_hex(hex).unwrap_or_else(|e| {
        tracing::warn!("Ignoring colour from server: {}", e);
        Color::WHITE
    })
}

/// What a roster update did to the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    Joined(ParticipantView),
    Left(ParticipantView),
    Renamed {
        previous: String,
        participant: ParticipantView,
    },
    Recolored(ParticipantView),
    Unchanged,
}

#[derive(Debug, Default)]
pub struct RosterMirror {
    me: Option<u64>,
    participants: Vec<ParticipantView>,
}

impl RosterMirror {
    pub fn shared() -> SharedMirror {
        Arc::new(Mutex::new(Self::default()))
    }

    /// Replace everything with the handshake snapshot
    pub fn reset(&mut self, accepted: &JoinAcceptedMessage) {
        self.me = Some(accepted.connection_id);
        self.participants = accepted
            .participants
            .iter()
            .map(ParticipantView::from)
            .collect();
    }

    /// Apply a `roster-update`. `joined: true` is an upsert.
    pub fn apply(&mut self, update: &RosterUpdateMessage) -> RosterChange {
        let incoming = ParticipantView::from(update);
        let position = self
            .participants
            .iter()
            .position(|p| p.connection_id == incoming.connection_id);

        match (update.joined, position) {
            (true, None) => {
                self.participants.push(incoming.clone());
                RosterChange::Joined(incoming)
            }
            (true, Some(index)) => {
                let current = &mut self.participants[index];
                let previous = std::mem::replace(current, incoming.clone());
                if previous.name != incoming.name {
                    RosterChange::Renamed {
                        previous: previous.name,
                        participant: incoming,
                    }
                } else if previous.color != incoming.color {
                    RosterChange::Recolored(incoming)
                } else {
                    RosterChange::Unchanged
                }
            }
            (false, Some(index)) => RosterChange::Left(self.participants.remove(index)),
            (false, None) => RosterChange::Unchanged,
        }
    }

    pub fn clear(&mut self) {
        self.me = None;
        self.participants.clear();
    }

    /// Clear the mirror, returning everyone except this process's participant
    pub fn disband(&mut self) -> Vec<ParticipantView> {
        let me = self.me.take();
        std::mem::take(&mut self.participants)
            .into_iter()
            .filter(|p| Some(p.connection_id) != me)
            .collect()
    }

    pub fn me(&self) -> Option<&ParticipantView> {
        let me = self.me?;
        self.participants.iter().find(|p| p.connection_id == me)
    }

    pub fn is_me(&self, connection_id: u64) -> bool {
        self.me == Some(connection_id)
    }

    /// Copy of the roster in join order
    pub fn snapshot(&self) -> Vec<ParticipantView> {
        self.participants.clone()
    }
}
