//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Participant entry of `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub connection_id: u64,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    /// RFC 3339 (UTC)
    pub joined_at: String,
}

/// Response of `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDto {
    pub capacity: usize,
    pub participants: Vec<ParticipantDetailDto>,
}
