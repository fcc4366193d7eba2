//! Participant side of a Parlor chat session.
//!
//! [`session::SessionManager`] owns the process-wide network role and drives
//! the embedded server (`host` / `server`) and the outbound connection
//! (`host` / `client`). Everything the user should see goes through a
//! [`presentation::PresentationSink`].

pub mod command;
pub mod connection;
pub mod error;
pub mod mirror;
pub mod presentation;
pub mod runner;
pub mod session;
pub mod subscription;
