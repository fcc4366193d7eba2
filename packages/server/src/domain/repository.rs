//! Repository trait for the participant roster.
//!
//! The domain layer defines the data access it needs; the infrastructure
//! layer provides the implementation (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::Participant,
    error::RepositoryError,
    value_object::{Color, ConnectionId, DisplayName},
};

/// Participant repository
///
/// Every read returns an owned snapshot. Callers never hold a live reference
/// into the roster, so concurrent mutation cannot corrupt what they see.
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Register a participant; fails on duplicates and when at capacity
    async fn insert(&self, participant: Participant) -> Result<(), RepositoryError>;

    /// Remove a participant; unknown ids return `None`
    async fn remove(&self, id: ConnectionId) -> Option<Participant>;

    /// Remove every participant, in join order
    async fn remove_all(&self) -> Vec<Participant>;

    async fn find(&self, id: ConnectionId) -> Option<Participant>;

    /// Update a display name, returning the updated participant
    async fn rename(&self, id: ConnectionId, name: DisplayName) -> Option<Participant>;

    /// Update a colour, returning the updated participant
    async fn recolor(&self, id: ConnectionId, color: Color) -> Option<Participant>;

    /// All participants in join order
    async fn list(&self) -> Vec<Participant>;

    async fn count(&self) -> usize;

    async fn capacity(&self) -> usize;
}
