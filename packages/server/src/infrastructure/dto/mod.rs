//! Data Transfer Objects (DTOs) for the chat session.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs shared by server and client
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
