//! Events the authoritative side pushes to connected participants.

use super::entity::{ChatEvent, Participant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Handshake acknowledgement for a newly joined participant.
    Welcome {
        you: Participant,
        participants: Vec<Participant>,
    },
    /// A relayed chat message.
    Chat(ChatEvent),
    /// A participant joined, changed name/colour (`joined: true`) or left.
    RosterChanged {
        participant: Participant,
        joined: bool,
    },
}
