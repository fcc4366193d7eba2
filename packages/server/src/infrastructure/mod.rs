//! Infrastructure layer: concrete storage, delivery and wire formats.

pub mod dto;
pub mod message_pusher;
pub mod repository;
