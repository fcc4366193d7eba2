//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::ConnectionId,
    infrastructure::dto::http::{ParticipantDetailDto, RosterDto},
    ui::state::AppState,
    usecase::RosterQueryError,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Snapshot of the roster, in join order
pub async fn get_participants(State(state): State<Arc<AppState>>) -> Json<RosterDto> {
    let participants = state.roster.enumerate().await;

    // Domain Model から DTO への変換
    Json(RosterDto {
        capacity: state.roster.capacity().await,
        participants: participants.iter().map(ParticipantDetailDto::from).collect(),
    })
}

/// One participant by connection id
pub async fn get_participant(
    State(state): State<Arc<AppState>>,
    Path(connection_id): Path<u64>,
) -> Result<Json<ParticipantDetailDto>, StatusCode> {
    match state.roster.lookup(ConnectionId::new(connection_id)).await {
        Ok(participant) => Ok(Json(ParticipantDetailDto::from(&participant))),
        Err(RosterQueryError::NotFound(_)) => Err(StatusCode::NOT_FOUND),
    }
}
