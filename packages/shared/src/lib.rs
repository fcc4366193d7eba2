//! Shared utilities for the Parlor packages.

pub mod logger;
pub mod time;
