//! WebSocket chat server implementation.

mod handler;
mod hub;
mod server;
mod signal;
pub mod state;

pub use hub::{Hub, HubCommand, HubHandle};
pub use server::{Server, ServerError, ServerHandle, ServerUseCases};
pub use signal::shutdown_signal;
