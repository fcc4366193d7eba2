//! Authoritative side of a Parlor chat session.
//!
//! The server owns the roster of connected participants, hands every new
//! connection a default identity and relays chat events to everyone,
//! sender included.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod bootstrap;
