//! Domain layer: the participant roster and the chat events relayed through it.
//!
//! Nothing in here knows about WebSockets or JSON. Data access and message
//! delivery are described as traits ([`ParticipantRepository`],
//! [`MessagePusher`]) and implemented by the infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod factory;
pub mod pusher;
pub mod repository;
pub mod roster;
pub mod value_object;

pub use entity::{ChatEvent, Participant};
pub use error::{MessagePushError, RepositoryError, RosterError, ValueObjectError};
pub use event::ServerEvent;
pub use factory::{
    DEFAULT_NAME_PREFIX, FixedIdentityGenerator, IdentityGenerator, RandomIdentityGenerator,
};
pub use pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use repository::ParticipantRepository;
pub use roster::{DEFAULT_MAX_PARTICIPANTS, Roster};
pub use value_object::{Color, ConnectionId, DisplayName, MessageBody, Timestamp};
