//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_participant, get_participants, health_check};
pub use websocket::websocket_handler;
