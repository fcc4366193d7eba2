//! In-memory repositories.

mod participant;

pub use participant::InMemoryParticipantRepository;
