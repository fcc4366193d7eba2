//! Session role state machine.

mod config;
mod manager;
mod role;

pub use config::SessionConfig;
pub use manager::SessionManager;
pub use role::SessionRole;
